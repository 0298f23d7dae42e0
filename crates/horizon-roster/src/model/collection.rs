//! Ordered record collection with change notifications.
//!
//! `RecordCollection<T>` is the owner-side store behind a list: an ordered
//! sequence of records, guarded by a read/write lock and announcing every
//! mutation through [`CollectionSignals`]. The pure engines in this module
//! tree never touch it directly; they read a [`snapshot`](RecordCollection::snapshot)
//! or [`items`](RecordCollection::items) and hand back a new order that the
//! owner commits with [`apply_order`](RecordCollection::apply_order).
//!
//! # Example
//!
//! ```
//! use horizon_roster::model::{Record, RecordCollection};
//!
//! let files = RecordCollection::new(vec![
//!     Record::new("1").with_field("name", "report.pdf"),
//!     Record::new("2").with_field("name", "photo.png"),
//! ]);
//!
//! files.signals().rows_inserted.connect(|(first, last)| {
//!     println!("rows {first}..={last} inserted");
//! });
//!
//! files.push(Record::new("3").with_field("name", "notes.txt"));
//! assert_eq!(files.len(), 3);
//! ```

use parking_lot::RwLock;

use horizon_roster_core::Signal;
use horizon_roster_core::logging::targets;

use super::record::{ListRecord, RecordId};
use super::reorder;

/// Signals emitted by a [`RecordCollection`].
pub struct CollectionSignals {
    /// Emitted after rows have been inserted.
    /// Args: (first row, last row)
    pub rows_inserted: Signal<(usize, usize)>,

    /// Emitted after rows have been removed.
    /// Args: (first row, last row)
    pub rows_removed: Signal<(usize, usize)>,

    /// Emitted after a single row has moved.
    /// Args: (source row, destination row)
    pub rows_moved: Signal<(usize, usize)>,

    /// Emitted after the collection was reordered as a whole.
    pub layout_changed: Signal<()>,

    /// Emitted after every record was replaced.
    pub collection_reset: Signal<()>,
}

impl Default for CollectionSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CollectionSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionSignals").finish_non_exhaustive()
    }
}

impl CollectionSignals {
    /// Creates a new set of collection signals.
    pub fn new() -> Self {
        Self {
            rows_inserted: Signal::new(),
            rows_removed: Signal::new(),
            rows_moved: Signal::new(),
            layout_changed: Signal::new(),
            collection_reset: Signal::new(),
        }
    }

    /// Runs `insert_fn`, then announces the inserted rows.
    pub fn emit_rows_inserted<F>(&self, first: usize, last: usize, insert_fn: F)
    where
        F: FnOnce(),
    {
        insert_fn();
        self.rows_inserted.emit((first, last));
    }

    /// Runs `remove_fn`, then announces the removed rows.
    pub fn emit_rows_removed<F>(&self, first: usize, last: usize, remove_fn: F)
    where
        F: FnOnce(),
    {
        remove_fn();
        self.rows_removed.emit((first, last));
    }

    /// Runs `reset_fn`, then announces the reset.
    pub fn emit_reset<F>(&self, reset_fn: F)
    where
        F: FnOnce(),
    {
        reset_fn();
        self.collection_reset.emit(());
    }
}

/// An ordered, shareable sequence of records.
///
/// Locks are always released before a signal is emitted, so slots may read
/// the collection they were notified by.
pub struct RecordCollection<T> {
    items: RwLock<Vec<T>>,
    signals: CollectionSignals,
}

impl<T> Default for RecordCollection<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            signals: CollectionSignals::new(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RecordCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCollection")
            .field("items", &*self.items.read())
            .finish()
    }
}

impl<T: ListRecord> RecordCollection<T> {
    /// Creates a collection holding `items` in the given order.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            signals: CollectionSignals::new(),
        }
    }

    /// Returns the collection's signals.
    pub fn signals(&self) -> &CollectionSignals {
        &self.signals
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Read-only access to the records in order.
    pub fn items(&self) -> impl std::ops::Deref<Target = Vec<T>> + '_ {
        self.items.read()
    }

    /// Returns the position of the record with `id`.
    pub fn position(&self, id: &RecordId) -> Option<usize> {
        reorder::position_of(&self.items.read(), id)
    }

    /// Checks whether a record with `id` is present.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.position(id).is_some()
    }

    /// Returns every record id, in order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.items
            .read()
            .iter()
            .map(|record| record.id().clone())
            .collect()
    }

    /// Appends a record to the end of the collection.
    pub fn push(&self, item: T) {
        let row = self.len();
        tracing::debug!(target: targets::COLLECTION, id = %item.id(), row, "appending record");
        self.signals.emit_rows_inserted(row, row, || {
            self.items.write().push(item);
        });
    }

    /// Inserts a record at `index`.
    ///
    /// Returns the record back if `index` is past the end.
    pub fn insert(&self, index: usize, item: T) -> Result<(), T> {
        if index > self.len() {
            return Err(item);
        }
        tracing::debug!(target: targets::COLLECTION, id = %item.id(), row = index, "inserting record");
        self.signals.emit_rows_inserted(index, index, || {
            let mut items = self.items.write();
            let index = index.min(items.len());
            items.insert(index, item);
        });
        Ok(())
    }

    /// Removes and returns the record with `id`.
    pub fn remove(&self, id: &RecordId) -> Option<T> {
        let index = self.position(id)?;
        let mut removed = None;
        self.signals.emit_rows_removed(index, index, || {
            let mut items = self.items.write();
            if index < items.len() {
                removed = Some(items.remove(index));
            }
        });
        tracing::debug!(target: targets::COLLECTION, %id, row = index, "removed record");
        removed
    }

    /// Replaces every record.
    pub fn set_items(&self, items: Vec<T>) {
        tracing::debug!(target: targets::COLLECTION, count = items.len(), "resetting collection");
        self.signals.emit_reset(|| {
            *self.items.write() = items;
        });
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.set_items(Vec::new());
    }

    /// Moves the record `source_id` onto `target_id`'s position.
    ///
    /// Returns `true` if the order changed.
    pub fn move_record(&self, source_id: &RecordId, target_id: &RecordId) -> bool {
        let moved = {
            let mut items = self.items.write();
            match (
                reorder::position_of(&items, source_id),
                reorder::position_of(&items, target_id),
            ) {
                (Some(from), Some(to)) if reorder::move_within(&mut items, from, to) => {
                    Some((from, to))
                }
                _ => None,
            }
        };

        match moved {
            Some((from, to)) => {
                tracing::debug!(target: targets::COLLECTION, %source_id, from, to, "moved record");
                self.signals.rows_moved.emit((from, to));
                true
            }
            None => false,
        }
    }
}

impl<T: ListRecord + Clone> RecordCollection<T> {
    /// Returns a clone of the record with `id`.
    pub fn get(&self, id: &RecordId) -> Option<T> {
        self.items
            .read()
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Returns a copy of the records in their current order.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Commits a new order produced by the reorder engine.
    ///
    /// The new order must hold exactly the same ids as the current one;
    /// otherwise it is rejected and `false` is returned. Emits
    /// `layout_changed` only when the order actually differs.
    pub fn apply_order(&self, reordered: Vec<T>) -> bool {
        {
            let mut items = self.items.write();
            if !same_ids(&items, &reordered) {
                tracing::warn!(
                    target: targets::COLLECTION,
                    current = items.len(),
                    proposed = reordered.len(),
                    "rejected order that does not permute the collection"
                );
                return false;
            }
            let unchanged = items
                .iter()
                .zip(&reordered)
                .all(|(a, b)| a.id() == b.id());
            if unchanged {
                return true;
            }
            *items = reordered;
        }
        self.signals.layout_changed.emit(());
        true
    }
}

fn same_ids<T: ListRecord>(current: &[T], proposed: &[T]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let mut a: Vec<&RecordId> = current.iter().map(|r| r.id()).collect();
    let mut b: Vec<&RecordId> = proposed.iter().map(|r| r.id()).collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

static_assertions::assert_impl_all!(RecordCollection<super::record::Record>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Record;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn groups() -> RecordCollection<Record> {
        RecordCollection::new(vec![
            Record::new("g1").with_field("name", "VIP"),
            Record::new("g2").with_field("name", "Regular"),
            Record::new("g3").with_field("name", "Trial"),
        ])
    }

    fn order(collection: &RecordCollection<Record>) -> Vec<String> {
        collection.ids().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_push_and_insert_emit_rows_inserted() {
        let collection = groups();
        let events = Arc::new(Mutex::new(Vec::new()));

        let recv = events.clone();
        collection.signals().rows_inserted.connect(move |&(first, last)| {
            recv.lock().push((first, last));
        });

        collection.push(Record::new("g4"));
        assert!(collection.insert(0, Record::new("g0")).is_ok());
        assert!(collection.insert(42, Record::new("gx")).is_err());

        assert_eq!(*events.lock(), vec![(3, 3), (0, 0)]);
        assert_eq!(order(&collection), vec!["g0", "g1", "g2", "g3", "g4"]);
    }

    #[test]
    fn test_remove_by_id() {
        let collection = groups();
        let removed = Arc::new(Mutex::new(None));

        let recv = removed.clone();
        collection.signals().rows_removed.connect(move |&(first, _)| {
            *recv.lock() = Some(first);
        });

        let record = collection.remove(&"g2".into());
        assert_eq!(record.map(|r| r.id), Some(RecordId::new("g2")));
        assert_eq!(*removed.lock(), Some(1));
        assert!(collection.remove(&"g2".into()).is_none());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_move_record() {
        let collection = groups();
        let moves = Arc::new(Mutex::new(Vec::new()));

        let recv = moves.clone();
        collection.signals().rows_moved.connect(move |&mv| recv.lock().push(mv));

        assert!(collection.move_record(&"g3".into(), &"g1".into()));
        assert_eq!(order(&collection), vec!["g3", "g1", "g2"]);
        assert!(!collection.move_record(&"g3".into(), &"g3".into()));
        assert!(!collection.move_record(&"nope".into(), &"g1".into()));
        assert_eq!(*moves.lock(), vec![(2, 0)]);
    }

    #[test]
    fn test_apply_order_requires_permutation() {
        let collection = groups();
        let layouts = Arc::new(Mutex::new(0));

        let recv = layouts.clone();
        collection.signals().layout_changed.connect(move |_| *recv.lock() += 1);

        let reordered = reorder::reorder(&collection.snapshot(), &"g1".into(), &"g3".into());
        assert!(collection.apply_order(reordered));
        assert_eq!(order(&collection), vec!["g2", "g3", "g1"]);

        assert!(collection.apply_order(collection.snapshot()));
        assert!(!collection.apply_order(vec![Record::new("g1")]));
        assert_eq!(*layouts.lock(), 1);
    }

    #[test]
    fn test_slots_can_read_collection() {
        let collection = Arc::new(groups());
        let seen = Arc::new(Mutex::new(0));

        let inner = collection.clone();
        let recv = seen.clone();
        collection.signals().collection_reset.connect(move |_| {
            *recv.lock() = inner.len();
        });

        collection.set_items(vec![Record::new("only")]);
        assert_eq!(*seen.lock(), 1);
        assert!(collection.get(&"only".into()).is_some());
        assert!(collection.contains(&"only".into()));
    }
}
