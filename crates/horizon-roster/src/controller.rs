//! List controller: composes filtering, pagination, reordering and
//! selection for one list.
//!
//! The controller is stateless apart from its configuration. Every
//! operation takes the collection and the current [`UiState`] and returns
//! a derived view or a new state; nothing is mutated in place. Owners that
//! want state kept for them use [`ListPage`](crate::page::ListPage).
//!
//! # Example
//!
//! ```
//! use horizon_roster::config::ListConfig;
//! use horizon_roster::controller::ListController;
//! use horizon_roster::model::{Record, UiState};
//!
//! let records = vec![
//!     Record::new("1").with_field("name", "Alpha"),
//!     Record::new("2").with_field("name", "Beta"),
//!     Record::new("3").with_field("name", "Gamma"),
//! ];
//! let controller = ListController::<Record>::new(ListConfig::new().with_page_size(2));
//!
//! let state = UiState::new().with_page(5);
//! let view = controller.view(&records, &state);
//!
//! // The stale page is clamped to the last one.
//! assert_eq!(view.page_info.effective_page, 2);
//! assert!(view.needs_page_correction(&state));
//! assert_eq!(view.visible_records[0].id.as_str(), "3");
//! ```

use std::sync::Arc;

use horizon_roster_core::PerfSpan;
use horizon_roster_core::logging::targets;

use crate::config::ListConfig;
use crate::model::{
    FieldSelector, ListRecord, PageInfo, RecordId, UiState, field_selector, filter_records,
    paginate, reorder,
};

/// What a list shows for a given collection and state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<'a, T> {
    /// Records on the effective page, in collection order.
    pub visible_records: Vec<&'a T>,
    /// Pagination metadata for the filtered records.
    pub page_info: PageInfo,
}

impl<T> ListView<'_, T> {
    /// Returns `true` if the state asked for a page other than the one shown.
    ///
    /// Owners should then persist
    /// [`effective_page`](PageInfo::effective_page) as the current page.
    pub fn needs_page_correction(&self, state: &UiState) -> bool {
        self.page_info.effective_page != state.current_page
    }

    /// Returns `true` if no record is visible.
    pub fn is_empty(&self) -> bool {
        self.visible_records.is_empty()
    }
}

impl<T: ListRecord> ListView<'_, T> {
    /// Ids of the visible records.
    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.visible_records
            .iter()
            .map(|record| record.id().clone())
            .collect()
    }
}

/// Raises a zero page size to one record per page.
fn normalized(mut config: ListConfig) -> ListConfig {
    if config.page_size == 0 {
        tracing::warn!(target: targets::CONTROLLER, "page size 0 raised to 1");
        config.page_size = 1;
    }
    config
}

/// Pure composition of the list engines for one configured list.
pub struct ListController<T> {
    config: ListConfig,
    selector: FieldSelector<T>,
}

impl<T> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            selector: Arc::clone(&self.selector),
        }
    }
}

impl<T> std::fmt::Debug for ListController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: ListRecord + 'static> ListController<T> {
    /// Creates a controller searching the configured field.
    pub fn new(config: ListConfig) -> Self {
        let config = normalized(config);
        let selector = field_selector(config.search_field.clone());
        Self { config, selector }
    }
}

impl<T> ListController<T> {
    /// Creates a controller with a custom search selector.
    ///
    /// The configured `search_field` is ignored.
    pub fn with_selector<F>(config: ListConfig, selector: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            config: normalized(config),
            selector: Arc::new(selector),
        }
    }

    /// Returns the list configuration.
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Records per page, never zero.
    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Filters, then paginates.
    ///
    /// Lists that are not searchable ignore the search text.
    pub fn view<'a>(&self, records: &'a [T], state: &UiState) -> ListView<'a, T> {
        let _perf = PerfSpan::new("ListController::view");

        let search_text = if self.config.searchable {
            state.search_text.as_str()
        } else {
            ""
        };
        let filtered = filter_records(records, search_text, self.selector.as_ref());

        let requested = i64::try_from(state.current_page).unwrap_or(i64::MAX);
        let page = paginate(&filtered, self.config.page_size, requested);

        tracing::trace!(
            target: targets::CONTROLLER,
            total = records.len(),
            matched = filtered.len(),
            requested = state.current_page,
            effective = page.info.effective_page,
            "computed list view"
        );

        ListView {
            visible_records: page.records.to_vec(),
            page_info: page.info,
        }
    }

    /// Sets the search text and goes back to the first page.
    pub fn set_search(&self, state: &UiState, text: &str) -> UiState {
        state.clone().with_search_text(text)
    }

    /// Selects or deselects one id.
    ///
    /// The id is not checked against the collection; unknown ids are inert
    /// because they never appear in a view.
    pub fn select(&self, state: &UiState, id: &RecordId, should_select: bool) -> UiState {
        let mut next = state.clone();
        next.selection.set(id, should_select);
        next
    }

    /// Selects or deselects every id in `ids`.
    pub fn select_all(&self, state: &UiState, ids: &[RecordId], should_select: bool) -> UiState {
        let mut next = state.clone();
        next.selection.set_many(ids, should_select);
        next
    }
}

impl<T: ListRecord> ListController<T> {
    /// Moves `source_id` onto `target_id`'s position; see [`reorder`].
    ///
    /// The UI state is unaffected.
    pub fn apply_reorder(&self, records: &[T], source_id: &RecordId, target_id: &RecordId) -> Vec<T>
    where
        T: Clone,
    {
        tracing::trace!(target: targets::CONTROLLER, %source_id, %target_id, "reorder");
        reorder(records, source_id, target_id)
    }

    /// Selects or deselects the records on the current page.
    pub fn select_all_visible(&self, state: &UiState, records: &[T], should_select: bool) -> UiState {
        let ids = self.view(records, state).visible_ids();
        self.select_all(state, &ids, should_select)
    }

    /// Selects or deselects every loaded record, visible or not.
    pub fn select_all_loaded(&self, state: &UiState, records: &[T], should_select: bool) -> UiState {
        let ids: Vec<RecordId> = records.iter().map(|record| record.id().clone()).collect();
        self.select_all(state, &ids, should_select)
    }

    /// Header checkbox state: every loaded record is selected.
    ///
    /// Always `false` for an empty collection.
    pub fn is_all_loaded_selected(&self, state: &UiState, records: &[T]) -> bool {
        state
            .selection
            .contains_all(records.iter().map(|record| record.id()))
    }

    /// Every record on the current page is selected.
    ///
    /// Always `false` when the page is empty.
    pub fn is_all_visible_selected(&self, state: &UiState, records: &[T]) -> bool {
        let view = self.view(records, state);
        state
            .selection
            .contains_all(view.visible_records.iter().map(|record| record.id()))
    }
}

static_assertions::assert_impl_all!(ListController<crate::model::Record>: Send, Sync);
