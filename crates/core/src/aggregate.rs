//! Result aggregation and pagination reconciliation
//!
//! Two fetch strategies feed the result list:
//!
//! - With no facet selected, the source paginates: one page of the unfiltered
//!   listing is shown as-is, alongside the source-reported total.
//! - With one or more facets selected, the source cannot intersect categories,
//!   so every selected facet's full item list is fetched, intersected here and
//!   paginated client-side.
//!
//! [`reconcile`] folds both into a single [`ResultView`].

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::{FacetItems, Item, ListingPage, PAGE_SIZE};

/// The core's view of a cached query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Nothing fetched and nothing in flight
    Idle,
    /// A fetch is in flight; `previous` holds the last settled data for the key
    Loading { previous: Option<T> },
    Ready(T),
    /// The last fetch failed
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    /// Settled data, or the previous data while a refetch is in flight
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            FetchState::Loading { previous } => previous.as_ref(),
            FetchState::Idle | FetchState::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What the presentation layer renders
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub items: Vec<Item>,
    pub total_count: u64,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ResultView {
    fn failed(total_count: u64, message: &str) -> Self {
        Self {
            items: Vec::new(),
            total_count,
            is_loading: false,
            error: Some(message.to_string()),
        }
    }
}

/// Last known non-zero unfiltered total.
///
/// Keeps the result count steady across refetches: a zero reported while a
/// page is loading does not replace a total already seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickyTotal {
    last_non_zero: Option<u64>,
}

impl StickyTotal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed total and return the one to display
    pub fn observe(&mut self, count: u64) -> u64 {
        if count > 0 {
            self.last_non_zero = Some(count);
        }
        self.current()
    }

    pub fn current(&self) -> u64 {
        self.last_non_zero.unwrap_or(0)
    }
}

struct Membership<'a> {
    item: &'a Item,
    facets: HashSet<u32>,
}

/// Items tagged with every selected facet.
///
/// Items are returned in the order their ids were first seen while scanning
/// `per_facet` in order. Items without an id never match.
pub fn compute_intersection(selected: &[u32], per_facet: &[FacetItems]) -> Vec<Item> {
    if selected.is_empty() {
        return Vec::new();
    }

    let mut memberships: IndexMap<u32, Membership> = IndexMap::new();
    for FacetItems { facet, items } in per_facet {
        for item in items {
            let Some(id) = item.id else {
                continue;
            };
            memberships
                .entry(id)
                .or_insert_with(|| Membership {
                    item,
                    facets: HashSet::new(),
                })
                .facets
                .insert(*facet);
        }
    }

    memberships
        .into_values()
        .filter(|m| selected.iter().all(|facet| m.facets.contains(facet)))
        .map(|m| m.item.clone())
        .collect()
}

/// Slice one page out of `items`; pages past the end are empty
pub fn paginate(items: &[Item], page: usize, page_size: usize) -> Vec<Item> {
    let Some(start) = page.checked_mul(page_size) else {
        return Vec::new();
    };
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

/// Total number of pages needed for `total_items`
pub fn total_pages(total_items: u64, page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size as u64)
}

/// Combine the filtered and unfiltered fetch states into the view for `page`.
pub fn reconcile(
    selected: &[u32],
    page: usize,
    filtered: &FetchState<Vec<FacetItems>>,
    plain: &FetchState<ListingPage>,
    sticky: &mut StickyTotal,
) -> ResultView {
    if selected.is_empty() {
        if let Some(message) = plain.error() {
            return ResultView::failed(sticky.current(), message);
        }

        let listing = plain.data();
        let total_count = sticky.observe(listing.map(|l| l.count).unwrap_or(0));
        return ResultView {
            items: listing.map(|l| l.items.clone()).unwrap_or_default(),
            total_count,
            is_loading: plain.is_loading(),
            error: None,
        };
    }

    if let Some(message) = filtered.error() {
        return ResultView::failed(0, message);
    }

    let matched = filtered
        .data()
        .map(|per_facet| compute_intersection(selected, per_facet))
        .unwrap_or_default();

    ResultView {
        total_count: matched.len() as u64,
        items: paginate(&matched, page, PAGE_SIZE),
        is_loading: filtered.is_loading(),
        error: None,
    }
}
