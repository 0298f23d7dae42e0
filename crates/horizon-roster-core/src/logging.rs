//! Logging facilities for Horizon Roster.
//!
//! Horizon Roster uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_roster::page=debug")
//!         .init();
//! }
//! ```
//!
//! Each subsystem logs under its own target (see [`targets`]) so that list
//! paging, theme updates and sign-in traffic can be filtered independently.

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_roster_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_roster_core::signal";
    /// Record collection mutations.
    pub const COLLECTION: &str = "horizon_roster::collection";
    /// List controller read/write paths.
    pub const CONTROLLER: &str = "horizon_roster::controller";
    /// Stateful list pages.
    pub const PAGE: &str = "horizon_roster::page";
    /// Configuration loading.
    pub const CONFIG: &str = "horizon_roster::config";
    /// Theme colour computation and application.
    pub const THEME: &str = "horizon_roster::theme";
    /// Authentication.
    pub const AUTH: &str = "horizon_roster::auth";
    /// Timing spans.
    pub const PERF: &str = "horizon_roster::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Wrap an operation in a `PerfSpan` to see how long it took when a
/// subscriber with span timing is installed.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_roster::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// `tracing::trace!` under the core target.
#[macro_export]
macro_rules! roster_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_roster_core", $($arg)*)
    };
}

/// `tracing::debug!` under the core target.
#[macro_export]
macro_rules! roster_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_roster_core", $($arg)*)
    };
}

/// `tracing::warn!` under the core target.
#[macro_export]
macro_rules! roster_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_roster_core", $($arg)*)
    };
}
