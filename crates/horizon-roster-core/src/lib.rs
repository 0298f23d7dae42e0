//! Core reactive primitives for Horizon Roster.
//!
//! This crate provides the small building blocks the list engine is wired
//! with:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Property System**: Value cells with change detection
//! - **Logging**: `tracing` targets, macros and timing spans
//!
//! # Example
//!
//! ```
//! use horizon_roster_core::{Property, Signal};
//!
//! let search = Property::new(String::new());
//! let search_changed = Signal::<String>::new();
//!
//! search_changed.connect(|text| println!("filtering by {text:?}"));
//!
//! if search.set("report".to_string()) {
//!     search_changed.emit(search.get());
//! }
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
