//! crates/evidentia_core/src/navigator.rs
//!
//! Tracks the current page of the open document and exposes the single
//! "go to page" operation used by both thumbnail clicks and citation
//! activation.

use crate::annotate::CitationRef;

/// Page navigation state for one open document.
///
/// The navigator is only constructed once rendering has finished and the
/// page count is final; its bounds check depends on that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNavigator {
    page_count: u32,
    current: u32,
}

impl PageNavigator {
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count,
            current: 1,
        }
    }

    /// Navigates to `page`, returning the page the host viewport should
    /// scroll to.
    ///
    /// Out-of-range pages are a silent no-op (`None`): citation data may
    /// carry stale page numbers and must not crash navigation. Navigating to
    /// the already-current page repeats the scroll request with no state
    /// change.
    pub fn go_to(&mut self, page: u32) -> Option<u32> {
        if page < 1 || page > self.page_count {
            return None;
        }
        self.current = page;
        Some(page)
    }

    /// Activates a citation marker: navigates to the first listed page.
    pub fn activate(&mut self, citation: &CitationRef) -> Option<u32> {
        self.go_to(citation.target_page()?)
    }

    pub fn current_page(&self) -> u32 {
        self.current
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Whether `page` is the single active entry in the thumbnail set.
    pub fn is_active(&self, page: u32) -> bool {
        self.current == page
    }
}
