//! Browse session state
//!
//! Holds what the presentation layer owns between renders: the facet
//! selection, the zero-based page index, and the sticky unfiltered total.
//! A new session starts from scratch, so nothing leaks between sessions.

use serde::Serialize;

use crate::aggregate::{reconcile, total_pages, FetchState, ResultView, StickyTotal};
use crate::catalog::{FacetItems, ListingPage, PAGE_SIZE};

#[derive(Debug, Clone, Default)]
pub struct Session {
    selected: Vec<u32>,
    page: usize,
    sticky: StickyTotal,
}

/// Page control state, 1-based for display
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PageControl {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub limit: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with an initial selection and page
    pub fn with_selection(selected: Vec<u32>, page: usize) -> Self {
        let mut session = Self::new();
        for facet in selected {
            if !session.selected.contains(&facet) {
                session.selected.push(facet);
            }
        }
        session.page = page;
        session
    }

    pub fn selected(&self) -> &[u32] {
        &self.selected
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn is_filtered(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Add the facet if absent, remove it otherwise. Returns whether it is now selected.
    ///
    /// Any selection change goes back to the first page.
    pub fn toggle(&mut self, facet: u32) -> bool {
        self.page = 0;
        if let Some(pos) = self.selected.iter().position(|f| *f == facet) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(facet);
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Move to the next page when `total_count` allows it
    pub fn next_page(&mut self, total_count: u64) -> bool {
        let next = self.page.saturating_add(1);
        if (next as u64) < total_pages(total_count, PAGE_SIZE) {
            self.page = next;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Compute the view for the current selection and page
    pub fn view(
        &mut self,
        filtered: &FetchState<Vec<FacetItems>>,
        plain: &FetchState<ListingPage>,
    ) -> ResultView {
        reconcile(&self.selected, self.page, filtered, plain, &mut self.sticky)
    }

    pub fn page_control(&self, total_count: u64) -> PageControl {
        PageControl {
            current_page: self.page as u64 + 1,
            total_pages: total_pages(total_count, PAGE_SIZE),
            total_items: total_count,
            limit: PAGE_SIZE,
        }
    }
}
