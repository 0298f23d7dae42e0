//! Per-list UI state.

use super::record::RecordId;
use super::selection::Selection;

/// The transient state of one list instance.
///
/// `page_size` is not part of the state: it is fixed per list by
/// [`ListConfig`](crate::config::ListConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Current search text. Empty means "no filter".
    pub search_text: String,
    /// Requested page, 1-indexed. May be stale until the next view
    /// clamps it.
    pub current_page: usize,
    /// Selected record ids.
    pub selection: Selection,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            current_page: 1,
            selection: Selection::new(),
        }
    }
}

impl UiState {
    /// Creates the default state: no search, first page, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy showing `page`.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }

    /// Returns a copy filtering by `text`, back on the first page.
    #[must_use]
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self.current_page = 1;
        self
    }

    /// Returns a copy with `ids` selected.
    #[must_use]
    pub fn with_selected<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = RecordId>,
    {
        for id in ids {
            self.selection.select(id);
        }
        self
    }

    /// Checks if an id is selected.
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.is_selected(id)
    }
}
