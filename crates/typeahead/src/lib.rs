//! Typeahead - a debounced auto-complete text input control.
//!
//! The control watches what the user types, waits until typing pauses, then
//! filters a candidate list by case-insensitive prefix and offers the matches
//! in a drop-down. Rendering is left to a [`PresentationSurface`] supplied by
//! the host toolkit; this crate owns only the behaviour.
//!
//! This is the main crate and re-exports the core building blocks from
//! `typeahead_core`.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use typeahead::prelude::*;
//!
//! let clock = ManualClock::new();
//! let timer_clock = clock.clone();
//! let mut text_box = AutoCompleteTextBox::with_timer(
//!     NullSurface,
//!     AutoCompleteConfig::default(),
//!     move |handler| ManualDebounceTimer::new(&timer_clock, handler),
//! )?;
//! text_box.set_candidates(vec!["apple", "apricot", "banana"]);
//!
//! text_box.on_user_input("a");
//! text_box.on_user_input("ap");
//! clock.advance(Duration::from_millis(500));
//! text_box.process_events();
//!
//! let shown: Vec<_> = text_box.suggestions().iter().map(|s| s.value()).collect();
//! assert_eq!(shown, ["apple", "apricot"]);
//! # Ok::<(), TypeaheadError>(())
//! ```

pub use typeahead_core::*;

mod candidates;
mod config;
mod control;
mod keys;
pub mod matcher;
pub mod prelude;
mod surface;

pub use candidates::CandidateStore;
pub use config::{
    AutoCompleteConfig, DEFAULT_DELAY, DEFAULT_MAX_DROP_DOWN_HEIGHT, DEFAULT_THRESHOLD,
    delay_from_ms, threshold_from,
};
pub use control::{AutoCompleteState, AutoCompleteTextBox, ControlEvent, InputOrigin};
pub use keys::Key;
pub use matcher::{CaseSensitivity, Suggestion, SuggestionEntry};
pub use surface::{NullSurface, PresentationSurface};

static_assertions::assert_impl_all!(ControlEvent: Send, Sync, Clone);
static_assertions::assert_impl_all!(AutoCompleteTextBox<NullSurface>: Send);
static_assertions::assert_not_impl_any!(AutoCompleteTextBox<NullSurface>: Sync);
