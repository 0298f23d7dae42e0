//! Record selection.
//!
//! [`Selection`] tracks which records are selected by id. It is independent
//! of filtering and pagination: a selection survives page changes and
//! searches, and ids that no longer exist are simply never shown.
//!
//! # Example
//!
//! ```
//! use horizon_roster::model::{RecordId, Selection};
//!
//! let mut selection = Selection::new();
//! selection.select(RecordId::new("f-1"));
//! selection.select(RecordId::new("f-2"));
//! selection.deselect(&RecordId::new("f-1"));
//!
//! assert!(selection.is_selected(&RecordId::new("f-2")));
//! assert_eq!(selection.len(), 1);
//! ```

use std::collections::HashSet;

use super::record::RecordId;

/// Set of selected record ids, remembered in selection order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Set of selected ids for O(1) lookup.
    ids: HashSet<RecordId>,
    /// Ids in the order they were selected.
    order: Vec<RecordId>,
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl Eq for Selection {}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if an id is selected.
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the number of selected ids.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns the selected ids in selection order.
    pub fn ids(&self) -> &[RecordId] {
        &self.order
    }

    /// Returns the only selected id, if exactly one is selected.
    pub fn single(&self) -> Option<&RecordId> {
        match self.order.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Adds an id. Returns `true` if it was not already selected.
    pub fn select(&mut self, id: RecordId) -> bool {
        if self.ids.insert(id.clone()) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Removes an id. Returns `true` if it was selected.
    pub fn deselect(&mut self, id: &RecordId) -> bool {
        if self.ids.remove(id) {
            self.order.retain(|selected| selected != id);
            true
        } else {
            false
        }
    }

    /// Selects or deselects an id. Returns `true` if the selection changed.
    pub fn set(&mut self, id: &RecordId, selected: bool) -> bool {
        if selected {
            self.select(id.clone())
        } else {
            self.deselect(id)
        }
    }

    /// Applies [`set`](Self::set) to every id. Returns `true` if anything changed.
    pub fn set_many<'a, I>(&mut self, ids: I, selected: bool) -> bool
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        ids.into_iter()
            .fold(false, |changed, id| self.set(id, selected) || changed)
    }

    /// Deselects everything. Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_selection = !self.order.is_empty();
        self.ids.clear();
        self.order.clear();
        had_selection
    }

    /// Drops every id for which `keep` returns `false`.
    ///
    /// Returns the ids that were dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<RecordId>
    where
        F: FnMut(&RecordId) -> bool,
    {
        let mut dropped = Vec::new();
        self.order.retain(|id| {
            if keep(id) {
                true
            } else {
                dropped.push(id.clone());
                false
            }
        });
        for id in &dropped {
            self.ids.remove(id);
        }
        dropped
    }

    /// Checks whether every id in `ids` is selected. False for an empty list.
    pub fn contains_all<'a, I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        let mut any = false;
        for id in ids {
            if !self.is_selected(id) {
                return false;
            }
            any = true;
        }
        any
    }
}

impl FromIterator<RecordId> for Selection {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for id in iter {
            selection.select(id);
        }
        selection
    }
}
