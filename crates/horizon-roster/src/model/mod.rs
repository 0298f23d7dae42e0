//! List model for Horizon Roster.
//!
//! This module holds the data side of a list: the records, the ordered
//! collection that owns them, and the pure engines that derive what a list
//! shows from that collection plus the user's UI state.
//!
//! # Core Types
//!
//! - `ListRecord`: The trait listed items implement (`Record` is a generic one)
//! - `RecordCollection`: Ordered, shareable store with change signals
//! - `UiState`: Search text, requested page and selection of one list
//! - `Selection`: Set of selected ids
//!
//! # Engines
//!
//! - `filter_records`: Case-insensitive substring search on one field
//! - `paginate`: Fixed-size pages with clamping of stale page numbers
//! - `reorder`: Drag-and-drop move of one record onto another's position
//!
//! The engines are pure functions. They never mutate their input; owners
//! commit their results explicitly.
//!
//! # Data Flow
//!
//! ```text
//! ┌──────────────────┐   filter   ┌──────────┐  paginate  ┌──────────────┐
//! │ RecordCollection │──────────> │ matches  │──────────> │ visible page │
//! └──────────────────┘            └──────────┘            └──────────────┘
//!          ^                                                      │
//!          │                reorder (drag end)                    │
//!          └──────────────────────────────────────────────────────┘
//! ```

mod collection;
mod filter;
mod pagination;
mod record;
mod reorder;
mod selection;
mod state;

pub use collection::{CollectionSignals, RecordCollection};
pub use filter::{FieldSelector, field_selector, filter_records};
pub use pagination::{Page, PageInfo, paginate};
pub use record::{FieldValue, ListRecord, Record, RecordId};
pub use reorder::{checked_move, move_within, position_of, reorder, reorder_in_place};
pub use selection::Selection;
pub use state::UiState;
