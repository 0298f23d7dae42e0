//! Horizon Roster - searchable, paginated, reorderable lists for admin
//! consoles.
//!
//! One parameterised list component serves every list in a console (files,
//! categories, member groups, activities). A list is an ordered record
//! collection plus UI state; each user event is turned into a new view or a
//! new state by pure engines:
//!
//! - [`model::filter_records`]: case-insensitive search on one field
//! - [`model::paginate`]: fixed-size pages, stale page numbers clamped
//! - [`model::reorder`]: drag one record onto another's position
//! - [`controller::ListController`]: the composition of the above plus
//!   selection
//! - [`page::ListPage`]: a stateful owner that persists corrections and
//!   emits signals
//!
//! Around the list engine sit the console's smaller pieces: [`config`],
//! the accent [`theme`], [`auth`] and the code resend [`countdown`].
//!
//! # Example
//!
//! ```
//! use horizon_roster::prelude::*;
//!
//! let groups = ListPage::from_config(
//!     ListConfig::new().with_page_size(2),
//!     vec![
//!         Record::new("1").with_field("name", "Alpha"),
//!         Record::new("2").with_field("name", "Beta"),
//!         Record::new("3").with_field("name", "Gamma"),
//!     ],
//! );
//!
//! groups.drag_end(&RecordId::new("3"), &RecordId::new("1"));
//! let first = groups.render();
//! assert_eq!(first.records[0].id.as_str(), "3");
//! assert!(first.page_info.shows_controls());
//! ```

pub use horizon_roster_core::*;

pub mod auth;
pub mod config;
pub mod controller;
pub mod countdown;
pub mod error;
pub mod model;
pub mod page;
pub mod theme;

pub use error::{Error, Result};

/// Commonly used types.
pub mod prelude {
    pub use crate::config::{ConsoleConfig, ListConfig};
    pub use crate::controller::{ListController, ListView};
    pub use crate::error::{Error, Result};
    pub use crate::model::{
        FieldValue, ListRecord, PageInfo, Record, RecordCollection, RecordId, Selection, UiState,
    };
    pub use crate::page::{ListPage, RenderedPage};
    pub use horizon_roster_core::{Property, Signal};
}
