//! Prelude module for Typeahead.
//!
//! ```
//! use typeahead::prelude::*;
//! ```

// ============================================================================
// The Control
// ============================================================================

pub use crate::{
    AutoCompleteConfig, AutoCompleteState, AutoCompleteTextBox, ControlEvent, InputOrigin,
};

// ============================================================================
// Candidates and Matching
// ============================================================================

pub use crate::{CandidateStore, CaseSensitivity, Suggestion, SuggestionEntry};

// ============================================================================
// Presentation
// ============================================================================

pub use crate::{Key, NullSurface, PresentationSurface};

// ============================================================================
// Core Systems
// ============================================================================

pub use typeahead_core::{
    ConnectionId, DebounceTimer, Generation, ManualClock, ManualDebounceTimer, Property, Result,
    Signal, ThreadDebounceTimer, TypeaheadError,
};
