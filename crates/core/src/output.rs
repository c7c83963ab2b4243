use serde::Serialize;

use crate::aggregate::ResultView;
use crate::catalog::{artwork_url, Facet};
use crate::session::PageControl;

/// Individual result entry output
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ItemOutput {
    pub id: Option<u32>,
    pub name: String,
    pub artwork_url: Option<String>,
}

/// Complete result output with items and pagination
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResultOutput {
    pub selected_types: Vec<Facet>,
    pub total_count: u64,
    pub items: Vec<ItemOutput>,
    pub pagination: PageControl,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Build the result output for a reconciled view
pub fn build_result_output(
    view: ResultView,
    pagination: PageControl,
    selected_types: Vec<Facet>,
    artwork_base: &str,
) -> ResultOutput {
    let items = view
        .items
        .into_iter()
        .map(|item| ItemOutput {
            artwork_url: artwork_url(artwork_base, item.id),
            id: item.id,
            name: item.name,
        })
        .collect();

    ResultOutput {
        selected_types,
        total_count: view.total_count,
        items,
        pagination,
        is_loading: view.is_loading,
        error: view.error,
    }
}

/// Selected facet values with their catalog names, unknown values named by number
pub fn selected_facets(catalog: &[Facet], selected: &[u32]) -> Vec<Facet> {
    selected
        .iter()
        .map(|value| Facet {
            name: crate::catalog::facet_name(catalog, *value)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            value: Some(*value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Item;

    #[test]
    fn test_build_result_output() {
        let view = ResultView {
            items: vec![Item::new("charizard", Some(6)), Item::new("missingno", None)],
            total_count: 2,
            is_loading: false,
            error: None,
        };
        let pagination = PageControl {
            current_page: 1,
            total_pages: 1,
            total_items: 2,
            limit: 20,
        };

        let output = build_result_output(view, pagination, vec![], "https://img.example/");

        assert_eq!(output.total_count, 2);
        assert_eq!(
            output.items[0].artwork_url.as_deref(),
            Some("https://img.example/6.png")
        );
        assert_eq!(output.items[1].artwork_url, None);
        assert_eq!(output.pagination.total_pages, 1);
    }

    #[test]
    fn test_selected_facets_names() {
        let catalog = vec![Facet {
            name: "fire".to_string(),
            value: Some(10),
        }];

        let selected = selected_facets(&catalog, &[10, 3]);

        assert_eq!(selected[0].name, "fire");
        assert_eq!(selected[1].name, "3");
        assert_eq!(selected[1].value, Some(3));
    }
}
