//! Logging facilities for Typeahead.
//!
//! Typeahead uses the `tracing` crate for instrumentation. Library code never
//! installs a subscriber; install one in your application to see output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("typeahead=debug,typeahead_core=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Debounce timer target.
    pub const TIMER: &str = "typeahead_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "typeahead_core::signal";
    /// Owner-thread event queue target.
    pub const QUEUE: &str = "typeahead_core::queue";
    /// Auto-complete control state transitions.
    pub const CONTROL: &str = "typeahead::control";
    /// Candidate matching.
    pub const MATCHER: &str = "typeahead::matcher";
    /// Performance spans.
    pub const PERF: &str = "typeahead::perf";
}

/// A guard for performance tracing spans.
///
/// Creates a tracing span that is entered on creation and exited when dropped.
/// The control wraps every match cycle in one.
///
/// ```
/// use typeahead_core::logging::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("match_cycle");
///     // ... timed work ...
/// }
/// ```
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
