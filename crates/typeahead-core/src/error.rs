//! Error types for Typeahead.

/// Result type alias for Typeahead operations.
pub type Result<T> = std::result::Result<T, TypeaheadError>;

/// The main error type for Typeahead operations.
///
/// Configuration errors are reported at assignment time; the control keeps its
/// previous value when a setter returns one of them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeaheadError {
    /// A debounce delay below zero was assigned.
    #[error("Delay must be zero or positive, got {0} ms")]
    NegativeDelay(i64),

    /// A matching threshold below zero was assigned.
    #[error("Threshold must be zero or positive, got {0}")]
    NegativeThreshold(i64),

    /// A drop-down height that is negative or not a number was assigned.
    #[error("Invalid drop-down height: {0}")]
    InvalidDropDownHeight(f64),

    /// The receiving end of an event queue has been dropped.
    #[error("Event queue has been closed")]
    QueueClosed,

    /// The control has been disposed and no longer accepts operations.
    #[error("Control has been disposed")]
    Disposed,

    /// A suggestion index outside the current drop-down contents.
    #[error("Suggestion index {index} out of range (drop-down holds {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of entries currently shown.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            TypeaheadError::NegativeDelay(-5).to_string(),
            "Delay must be zero or positive, got -5 ms"
        );
        assert_eq!(
            TypeaheadError::IndexOutOfRange { index: 3, len: 2 }.to_string(),
            "Suggestion index 3 out of range (drop-down holds 2)"
        );
    }
}
