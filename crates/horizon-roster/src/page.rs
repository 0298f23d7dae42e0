//! Stateful list page.
//!
//! [`ListPage`] is the owner of one list instance: it holds the record
//! collection and the UI state, runs every user event through a
//! [`ListController`], writes the results back, and announces what changed.
//! In particular, a page number that the view had to clamp is persisted on
//! the next [`render`](ListPage::render), so the state never keeps pointing
//! at a page that does not exist.
//!
//! # Example
//!
//! ```
//! use horizon_roster::config::ListConfig;
//! use horizon_roster::model::Record;
//! use horizon_roster::page::ListPage;
//!
//! let page = ListPage::from_config(
//!     ListConfig::new().with_page_size(2),
//!     vec![
//!         Record::new("1").with_field("name", "Alpha"),
//!         Record::new("2").with_field("name", "Beta"),
//!         Record::new("3").with_field("name", "Gamma"),
//!     ],
//! );
//!
//! page.page_changed.connect(|page| println!("now on page {page}"));
//!
//! page.next_page();
//! assert_eq!(page.render().records.len(), 1);
//!
//! page.set_search_text("ALPHA");
//! assert_eq!(page.current_page(), 1);
//! ```

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use horizon_roster_core::Signal;
use horizon_roster_core::logging::targets;

use crate::config::ListConfig;
use crate::controller::{ListController, ListView};
use crate::error::{Error, Result};
use crate::model::{ListRecord, PageInfo, RecordCollection, RecordId, UiState};

/// An owned copy of one rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage<T> {
    /// Records on the page, in collection order.
    pub records: Vec<T>,
    /// Whether each record in `records` is selected.
    pub selected: Vec<bool>,
    /// Pagination metadata.
    pub page_info: PageInfo,
}

/// One list instance with its state.
///
/// The selection never outlives its records: removing records, whether
/// through the page or directly on [`collection`](Self::collection), drops
/// their ids from the selection and emits `selection_changed`.
pub struct ListPage<T> {
    controller: ListController<T>,
    collection: Arc<RecordCollection<T>>,
    state: Arc<RwLock<UiState>>,

    /// Emitted with the new current page whenever it changes, including
    /// when a stale page is corrected during rendering.
    pub page_changed: Signal<usize>,

    /// Emitted with the new search text.
    pub search_changed: Signal<String>,

    /// Emitted with the selected ids whenever the selection changes.
    pub selection_changed: Arc<Signal<Vec<RecordId>>>,

    /// Emitted after the collection order changed by dragging.
    pub order_changed: Signal<()>,
}

impl<T> std::fmt::Debug for ListPage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPage")
            .field("controller", &self.controller)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl<T: ListRecord + Send + Sync + 'static> ListPage<T> {
    /// Creates a page searching the configured field.
    pub fn from_config(config: ListConfig, records: Vec<T>) -> Self {
        Self::new(ListController::new(config), records)
    }

    /// Creates a page on its first page, with nothing selected.
    pub fn new(controller: ListController<T>, records: Vec<T>) -> Self {
        let collection = Arc::new(RecordCollection::new(records));
        let state = Arc::new(RwLock::new(UiState::new()));
        let selection_changed = Arc::new(Signal::new());

        let pruner = selection_pruner(
            Arc::downgrade(&collection),
            Arc::clone(&state),
            Arc::clone(&selection_changed),
        );
        collection
            .signals()
            .rows_removed
            .connect(move |_| pruner());
        let pruner = selection_pruner(
            Arc::downgrade(&collection),
            Arc::clone(&state),
            Arc::clone(&selection_changed),
        );
        collection
            .signals()
            .collection_reset
            .connect(move |()| pruner());

        Self {
            controller,
            collection,
            state,
            page_changed: Signal::new(),
            search_changed: Signal::new(),
            selection_changed,
            order_changed: Signal::new(),
        }
    }
}

/// Returns a slot body that drops selected ids whose records are gone.
fn selection_pruner<T: ListRecord + Send + Sync + 'static>(
    collection: Weak<RecordCollection<T>>,
    state: Arc<RwLock<UiState>>,
    selection_changed: Arc<Signal<Vec<RecordId>>>,
) -> impl Fn() + Send + Sync + 'static {
    move || {
        if let Some(collection) = collection.upgrade() {
            prune_selection(&collection, &state, &selection_changed);
        }
    }
}

fn prune_selection<T: ListRecord>(
    collection: &RecordCollection<T>,
    state: &RwLock<UiState>,
    selection_changed: &Signal<Vec<RecordId>>,
) {
    let remaining = {
        let items = collection.items();
        let mut state = state.write();
        let dropped = state
            .selection
            .retain(|id| items.iter().any(|record| record.id() == id));
        if dropped.is_empty() {
            return;
        }
        tracing::debug!(target: targets::PAGE, dropped = dropped.len(), "pruned selection");
        state.selection.ids().to_vec()
    };
    selection_changed.emit(remaining);
}

impl<T: ListRecord> ListPage<T> {
    /// Returns the controller.
    pub fn controller(&self) -> &ListController<T> {
        &self.controller
    }

    /// Returns the underlying collection.
    ///
    /// Removals made here are reflected in the selection.
    pub fn collection(&self) -> &RecordCollection<T> {
        &self.collection
    }

    /// Returns a copy of the UI state.
    pub fn state(&self) -> UiState {
        self.state.read().clone()
    }

    /// Returns the current search text.
    pub fn search_text(&self) -> String {
        self.state.read().search_text.clone()
    }

    /// Returns the current page as stored. It may be stale until the next
    /// [`render`](Self::render).
    pub fn current_page(&self) -> usize {
        self.state.read().current_page
    }

    /// Returns the selected ids, in selection order.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.state.read().selection.ids().to_vec()
    }

    // =========================================================================
    // Search and paging
    // =========================================================================

    /// Changes the search text and returns to the first page.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        let (old_page, changed) = {
            let mut state = self.state.write();
            let old_page = state.current_page;
            let changed = state.search_text != text;
            *state = self.controller.set_search(&state, &text);
            (old_page, changed)
        };

        if changed {
            tracing::debug!(target: targets::PAGE, search = %text, "search changed");
            self.search_changed.emit(text);
        }
        if old_page != 1 {
            self.page_changed.emit(1);
        }
    }

    /// Jumps to `page`, clamped into the available pages.
    ///
    /// Returns the page actually shown.
    pub fn go_to_page(&self, page: usize) -> usize {
        let (state, total_pages) = {
            let items = self.collection.items();
            let state = self.state();
            let total_pages = self.controller.view(&items, &state).page_info.total_pages;
            (state, total_pages)
        };
        let target = page.clamp(1, total_pages);
        if target != state.current_page {
            self.state.write().current_page = target;
            tracing::trace!(target: targets::PAGE, page = target, "page changed");
            self.page_changed.emit(target);
        }
        target
    }

    /// Advances one page if there is a next one.
    pub fn next_page(&self) -> usize {
        self.go_to_page(self.current_page().saturating_add(1))
    }

    /// Goes back one page if there is a previous one.
    pub fn previous_page(&self) -> usize {
        self.go_to_page(self.current_page().saturating_sub(1))
    }

    /// Builds the view of `items` for `state` and runs `f` on it.
    ///
    /// Returns `f`'s result and the page to persist, if the stored one was
    /// stale.
    fn view_of<R>(
        &self,
        items: &[T],
        state: &UiState,
        f: impl FnOnce(&ListView<'_, T>, &UiState) -> R,
    ) -> (R, Option<usize>) {
        let view = self.controller.view(items, state);
        let corrected = view
            .needs_page_correction(state)
            .then_some(view.page_info.effective_page);
        (f(&view, state), corrected)
    }

    fn persist_corrected_page(&self, stale: usize, corrected: usize) {
        {
            let mut state = self.state.write();
            // Only correct the page we rendered; a concurrent jump wins.
            if state.current_page != stale {
                return;
            }
            state.current_page = corrected;
        }
        tracing::debug!(target: targets::PAGE, stale, corrected, "corrected stale page");
        self.page_changed.emit(corrected);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects or deselects one record. Returns `true` if the selection
    /// changed.
    pub fn set_selected(&self, id: &RecordId, selected: bool) -> bool {
        self.update_selection(|controller, state, _| controller.select(state, id, selected))
    }

    /// Selects or deselects the records on the current page.
    pub fn select_all_visible(&self, selected: bool) -> bool {
        self.update_selection(|controller, state, records| {
            controller.select_all_visible(state, records, selected)
        })
    }

    /// Selects or deselects every loaded record.
    pub fn select_all_loaded(&self, selected: bool) -> bool {
        self.update_selection(|controller, state, records| {
            controller.select_all_loaded(state, records, selected)
        })
    }

    /// Deselects everything.
    pub fn clear_selection(&self) -> bool {
        self.update_selection(|_, state, _| {
            let mut next = state.clone();
            next.selection.clear();
            next
        })
    }

    /// Header checkbox state: every loaded record is selected.
    pub fn is_all_loaded_selected(&self) -> bool {
        let state = self.state();
        self.controller
            .is_all_loaded_selected(&state, &self.collection.items())
    }

    fn update_selection<F>(&self, f: F) -> bool
    where
        F: FnOnce(&ListController<T>, &UiState, &[T]) -> UiState,
    {
        let ids = {
            let items = self.collection.items();
            let mut state = self.state.write();
            let next = f(&self.controller, &state, &items);
            if next.selection == state.selection {
                return false;
            }
            *state = next;
            state.selection.ids().to_vec()
        };
        tracing::trace!(target: targets::PAGE, selected = ids.len(), "selection changed");
        self.selection_changed.emit(ids);
        true
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// Appends a record. Fails if a record with the same id exists.
    pub fn add_record(&self, record: T) -> Result<()> {
        if self.collection.contains(record.id()) {
            return Err(Error::DuplicateRecord(record.id().clone()));
        }
        self.collection.push(record);
        Ok(())
    }

    /// Removes a record and drops it from the selection.
    pub fn remove_record(&self, id: &RecordId) -> Option<T> {
        self.collection.remove(id)
    }

    /// Replaces every record, for example after a reload.
    ///
    /// Selected ids that disappear are dropped; the page is re-clamped on
    /// the next render.
    pub fn replace_records(&self, records: Vec<T>) {
        self.collection.set_items(records);
    }
}

impl<T: ListRecord + Clone> ListPage<T> {
    /// Renders the current page.
    ///
    /// A stale page is clamped, persisted and announced.
    pub fn render(&self) -> RenderedPage<T> {
        let state = self.state();
        let (rendered, corrected) = {
            let items = self.collection.items();
            self.view_of(&items, &state, |view, state| RenderedPage {
                records: view.visible_records.iter().map(|&r| r.clone()).collect(),
                selected: view
                    .visible_records
                    .iter()
                    .map(|r| state.is_selected(r.id()))
                    .collect(),
                page_info: view.page_info,
            })
        };

        if let Some(page) = corrected {
            self.persist_corrected_page(state.current_page, page);
        }
        rendered
    }

    /// Runs `f` on the current view.
    ///
    /// The view is built over a snapshot of the records and no lock is held
    /// while `f` runs, so `f` may mutate this page. A clamped page is
    /// persisted (and `page_changed` emitted) after `f` returns, unless `f`
    /// moved to another page itself.
    pub fn with_view<R>(&self, f: impl FnOnce(&ListView<'_, T>, &UiState) -> R) -> R {
        let state = self.state();
        let items = self.collection.snapshot();
        let (result, corrected) = self.view_of(&items, &state, f);

        if let Some(page) = corrected {
            self.persist_corrected_page(state.current_page, page);
        }
        result
    }

    /// Completes a drag gesture: moves `source_id` onto `target_id`'s
    /// position.
    ///
    /// Returns `true` if the order changed.
    pub fn drag_end(&self, source_id: &RecordId, target_id: &RecordId) -> bool {
        let (before, reordered) = {
            let items = self.collection.items();
            let before: Vec<RecordId> = items.iter().map(|r| r.id().clone()).collect();
            let reordered = self.controller.apply_reorder(&items, source_id, target_id);
            (before, reordered)
        };

        let unchanged = before.iter().eq(reordered.iter().map(|r| r.id()));
        if unchanged || !self.collection.apply_order(reordered) {
            return false;
        }
        tracing::debug!(target: targets::PAGE, %source_id, %target_id, "records reordered");
        self.order_changed.emit(());
        true
    }

    /// Returns the selected records, in collection order.
    pub fn selected_records(&self) -> Vec<T> {
        let items = self.collection.items();
        let state = self.state.read();
        items
            .iter()
            .filter(|record| state.is_selected(record.id()))
            .cloned()
            .collect()
    }

    /// Returns the selected record if exactly one is selected.
    ///
    /// Detail panels show a record only in that case.
    pub fn single_selection(&self) -> Option<T> {
        let id = self.state.read().selection.single().cloned()?;
        self.collection.get(&id)
    }
}

static_assertions::assert_impl_all!(ListPage<crate::model::Record>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn files() -> Vec<Record> {
        (1..=5)
            .map(|i| Record::new(format!("f{i}")).with_field("name", format!("file-{i}.txt")))
            .collect()
    }

    fn page(page_size: usize) -> ListPage<Record> {
        ListPage::from_config(ListConfig::new().with_page_size(page_size), files())
    }

    fn ids(rendered: &RenderedPage<Record>) -> Vec<&str> {
        rendered.records.iter().map(|r| r.id.as_str()).collect()
    }

    fn record_pages(page: &ListPage<Record>) -> Arc<Mutex<Vec<usize>>> {
        let pages = Arc::new(Mutex::new(Vec::new()));
        let recv = pages.clone();
        page.page_changed.connect(move |&p| recv.lock().push(p));
        pages
    }

    #[test]
    fn test_paging() {
        let page = page(2);
        let pages = record_pages(&page);

        assert_eq!(page.next_page(), 2);
        assert_eq!(page.next_page(), 3);
        assert_eq!(page.next_page(), 3);
        assert_eq!(ids(&page.render()), vec!["f5"]);
        assert_eq!(page.previous_page(), 2);
        assert_eq!(page.go_to_page(0), 1);
        assert_eq!(page.previous_page(), 1);

        assert_eq!(*pages.lock(), vec![2, 3, 2, 1]);
    }

    #[test]
    fn test_render_persists_corrected_page() {
        let page = page(2);
        page.go_to_page(3);
        let pages = record_pages(&page);

        page.replace_records(files().into_iter().take(2).collect());
        assert_eq!(page.current_page(), 3);

        let rendered = page.render();
        assert_eq!(rendered.page_info.effective_page, 1);
        assert_eq!(page.current_page(), 1);
        assert_eq!(*pages.lock(), vec![1]);

        page.render();
        assert_eq!(*pages.lock(), vec![1]);
    }

    #[test]
    fn test_search_resets_page_and_emits() {
        let page = page(2);
        page.go_to_page(2);

        let searches = Arc::new(Mutex::new(Vec::new()));
        let recv = searches.clone();
        page.search_changed.connect(move |s: &String| recv.lock().push(s.clone()));
        let pages = record_pages(&page);

        page.set_search_text("FILE-4");
        assert_eq!(page.current_page(), 1);
        assert_eq!(ids(&page.render()), vec!["f4"]);
        page.set_search_text("FILE-4");

        assert_eq!(*searches.lock(), vec!["FILE-4".to_string()]);
        assert_eq!(*pages.lock(), vec![1]);
    }

    #[test]
    fn test_selection_flags_and_signals() {
        let page = page(2);
        let emitted = Arc::new(Mutex::new(0));
        let recv = emitted.clone();
        page.selection_changed.connect(move |_| *recv.lock() += 1);

        assert!(page.set_selected(&"f2".into(), true));
        assert!(!page.set_selected(&"f2".into(), true));
        let rendered = page.render();
        assert_eq!(rendered.selected, vec![false, true]);

        assert!(page.select_all_visible(true));
        assert!(!page.is_all_loaded_selected());
        assert!(page.select_all_loaded(true));
        assert!(page.is_all_loaded_selected());
        assert!(page.clear_selection());
        assert!(!page.clear_selection());

        assert_eq!(*emitted.lock(), 4);
    }

    #[test]
    fn test_single_selection_and_selected_records() {
        let page = page(2);
        page.set_selected(&"f4".into(), true);
        assert_eq!(page.single_selection().map(|r| r.id), Some(RecordId::new("f4")));

        page.set_selected(&"f1".into(), true);
        assert!(page.single_selection().is_none());
        let selected: Vec<String> = page
            .selected_records()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(selected, vec!["f1", "f4"]);
    }

    #[test]
    fn test_add_and_remove_records() {
        let page = page(2);
        assert!(page.add_record(Record::new("f6")).is_ok());
        assert!(matches!(
            page.add_record(Record::new("f6")),
            Err(Error::DuplicateRecord(id)) if id.as_str() == "f6"
        ));

        page.set_selected(&"f6".into(), true);
        page.set_selected(&"f1".into(), true);
        assert!(page.remove_record(&"f6".into()).is_some());
        assert!(page.remove_record(&"f6".into()).is_none());
        assert_eq!(page.selected_ids(), vec![RecordId::new("f1")]);
    }

    #[test]
    fn test_removal_through_collection_prunes_selection() {
        let page = page(2);
        let emitted = Arc::new(Mutex::new(Vec::new()));
        let recv = emitted.clone();
        page.selection_changed
            .connect(move |ids: &Vec<RecordId>| recv.lock().push(ids.clone()));

        page.set_selected(&"f1".into(), true);
        page.set_selected(&"f2".into(), true);
        assert!(page.collection().remove(&"f2".into()).is_some());

        assert_eq!(page.selected_ids(), vec![RecordId::new("f1")]);
        assert_eq!(page.single_selection().map(|r| r.id), Some(RecordId::new("f1")));
        assert_eq!(emitted.lock().last(), Some(&vec![RecordId::new("f1")]));

        assert!(page.select_all_loaded(true));
        page.collection().clear();
        assert!(page.selected_ids().is_empty());
        assert!(page.single_selection().is_none());
        assert_eq!(emitted.lock().last(), Some(&Vec::new()));
    }

    #[test]
    fn test_with_view_closure_may_mutate_page() {
        let page = page(2);
        let visible = page.with_view(|view, _| {
            let shown = view.visible_ids();
            assert!(page.remove_record(&shown[0]).is_some());
            assert!(page.drag_end(&"f5".into(), &"f2".into()));
            shown
        });

        assert_eq!(visible, vec![RecordId::new("f1"), RecordId::new("f2")]);
        assert_eq!(ids(&page.render()), vec!["f5", "f2"]);
    }

    #[test]
    fn test_zero_page_size_is_one_record_per_page() {
        let page = page(0);
        assert_eq!(page.controller().page_size(), 1);
        assert_eq!(page.go_to_page(9), 5);
        assert_eq!(ids(&page.render()), vec!["f5"]);
    }

    #[test]
    fn test_drag_end() {
        let page = page(10);
        let orders = Arc::new(Mutex::new(0));
        let recv = orders.clone();
        page.order_changed.connect(move |_| *recv.lock() += 1);

        assert!(page.drag_end(&"f5".into(), &"f2".into()));
        assert!(!page.drag_end(&"f5".into(), &"f5".into()));
        assert!(!page.drag_end(&"f5".into(), &"nope".into()));

        assert_eq!(ids(&page.render()), vec!["f1", "f5", "f2", "f3", "f4"]);
        assert_eq!(*orders.lock(), 1);
    }
}
