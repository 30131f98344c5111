//! Logging facilities for Horizon Forms.
//!
//! Horizon Forms uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; applications do that themselves:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_forms=debug")
//!         .init();
//! }
//! ```
//!
//! Use the [`targets`] constants with `tracing` directives to filter by
//! subsystem.

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_forms_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_forms_core::signal";
    /// Main loop target.
    pub const EVENT_LOOP: &str = "horizon_forms_core::event_loop";
    /// Form data source and widget binding.
    pub const FORM: &str = "horizon_forms::form";
    /// Row value and visibility changes.
    pub const ROW: &str = "horizon_forms::row";
    /// Selection screens.
    pub const SELECTION: &str = "horizon_forms::selection";
    /// Remote schema forms.
    pub const REMOTE: &str = "horizon_forms::remote";
    /// Headless widgets and navigation stack.
    pub const HEADLESS: &str = "horizon_forms::headless";
    /// [`PerfSpan`](super::PerfSpan) timings.
    pub const PERF: &str = "horizon_forms::perf";
}

/// A guard that records how long an operation takes.
///
/// The span is entered on creation and closed when the guard is dropped.
///
/// ```
/// use horizon_forms_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("reload");
///     // ... measured work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
