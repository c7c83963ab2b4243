//! Cache keys for catalog queries
//!
//! Every fetch is identified by the operation it performs plus its parameters.
//! Two requests with equal keys are interchangeable: the cache layer serves
//! one from the other and deduplicates them while in flight.

use std::fmt;

/// Composite cache key: operation identity plus parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    /// The facet catalog
    Facets,
    /// One page of the unfiltered listing
    Listing { page: usize },
    /// Full item lists for a facet combination, sorted and deduplicated
    ByFacets(Vec<u32>),
}

impl QueryKey {
    pub fn listing(page: usize) -> Self {
        QueryKey::Listing { page }
    }

    /// Key a facet combination by its content, independent of selection order.
    pub fn by_facets(facets: &[u32]) -> Self {
        QueryKey::ByFacets(normalize_facets(facets))
    }

    /// Short operation name, used in logs
    pub fn operation(&self) -> &'static str {
        match self {
            QueryKey::Facets => "facets",
            QueryKey::Listing { .. } => "listing",
            QueryKey::ByFacets(_) => "by-facets",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Facets => write!(f, "facets"),
            QueryKey::Listing { page } => write!(f, "listing[page={page}]"),
            QueryKey::ByFacets(facets) => {
                let facets: Vec<String> = facets.iter().map(u32::to_string).collect();
                write!(f, "by-facets[{}]", facets.join(","))
            }
        }
    }
}

/// Sort and deduplicate facet values
pub fn normalize_facets(facets: &[u32]) -> Vec<u32> {
    let mut facets = facets.to_vec();
    facets.sort_unstable();
    facets.dedup();
    facets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_facets_is_order_independent() {
        assert_eq!(QueryKey::by_facets(&[10, 3]), QueryKey::by_facets(&[3, 10]));
    }

    #[test]
    fn test_by_facets_distinguishes_equal_sized_selections() {
        assert_ne!(QueryKey::by_facets(&[10, 3]), QueryKey::by_facets(&[10, 11]));
    }

    #[test]
    fn test_by_facets_dedups() {
        assert_eq!(QueryKey::by_facets(&[3, 3, 10]), QueryKey::ByFacets(vec![3, 10]));
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryKey::Facets.to_string(), "facets");
        assert_eq!(QueryKey::listing(2).to_string(), "listing[page=2]");
        assert_eq!(QueryKey::by_facets(&[10, 3]).to_string(), "by-facets[3,10]");
        assert_eq!(QueryKey::listing(2).operation(), "listing");
        assert_eq!(QueryKey::by_facets(&[3]).operation(), "by-facets");
    }
}
