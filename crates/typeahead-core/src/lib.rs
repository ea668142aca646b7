//! Core systems for Typeahead.
//!
//! This crate provides the building blocks the auto-complete control is made
//! of, independent of any particular UI toolkit:
//!
//! - **Signal/Slot System**: Type-safe notification of state changes
//! - **Property System**: Values with change detection
//! - **Debounce Timers**: Single-shot, restartable timers with generation checks
//! - **Event Queue**: Hand-off from timer threads back to the owner (UI) thread
//! - **Thread Affinity**: Checks that owner-thread state stays on its thread
//!
//! # Debounce Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use typeahead_core::{DebounceTimer, EventQueue, ManualClock, ManualDebounceTimer};
//!
//! let queue = EventQueue::new();
//! let poster = queue.poster();
//! let clock = ManualClock::new();
//!
//! // Expiry fires on whatever thread drives the clock; hand it to the queue.
//! let mut timer = ManualDebounceTimer::new(&clock, Arc::new(move |generation| {
//!     let _ = poster.post(generation);
//! }));
//!
//! timer.start(Duration::from_millis(500));
//! timer.start(Duration::from_millis(500)); // restarts, first start is void
//! clock.advance(Duration::from_millis(500));
//!
//! let fired = queue.drain();
//! assert_eq!(fired, vec![timer.current_generation()]);
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod queue;
pub mod signal;
pub mod thread_check;
pub mod timer;

pub use error::{Result, TypeaheadError};
pub use logging::PerfSpan;
pub use property::Property;
pub use queue::{EventPoster, EventQueue};
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
pub use timer::{
    DebounceTimer, ExpiryHandler, Generation, ManualClock, ManualDebounceTimer,
    ThreadDebounceTimer,
};
