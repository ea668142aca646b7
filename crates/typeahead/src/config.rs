//! Configuration for the auto-complete control.
//!
//! Invalid values (negative delay or threshold, negative or NaN drop-down
//! height) are rejected when they are assigned, never clamped.

use std::time::Duration;

use typeahead_core::{Result, TypeaheadError};

use crate::matcher::CaseSensitivity;

/// Default debounce delay.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Default minimum query length.
pub const DEFAULT_THRESHOLD: usize = 1;

/// Default maximum drop-down height handed to the surface.
pub const DEFAULT_MAX_DROP_DOWN_HEIGHT: f64 = 150.0;

/// Configuration for an [`AutoCompleteTextBox`](crate::AutoCompleteTextBox).
///
/// ```
/// use typeahead::AutoCompleteConfig;
///
/// let config = AutoCompleteConfig::default()
///     .with_delay_ms(250)?
///     .with_threshold(2)?;
/// assert_eq!(config.threshold, 2);
///
/// assert!(AutoCompleteConfig::default().with_delay_ms(-1).is_err());
/// # Ok::<(), typeahead::TypeaheadError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AutoCompleteConfig {
    /// Debounce interval. Zero matches synchronously on every keystroke.
    pub delay: Duration,
    /// Minimum query length, in characters, before matching happens.
    pub threshold: usize,
    /// How letter case is compared.
    pub case_sensitivity: CaseSensitivity,
    /// Passed through to the presentation surface.
    pub max_drop_down_height: f64,
}

impl Default for AutoCompleteConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            threshold: DEFAULT_THRESHOLD,
            case_sensitivity: CaseSensitivity::default(),
            max_drop_down_height: DEFAULT_MAX_DROP_DOWN_HEIGHT,
        }
    }
}

impl AutoCompleteConfig {
    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        validate_height(self.max_drop_down_height).map(|_| ())
    }

    /// Set the delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the delay in milliseconds, rejecting negative values.
    pub fn with_delay_ms(mut self, delay_ms: i64) -> Result<Self> {
        self.delay = delay_from_ms(delay_ms)?;
        Ok(self)
    }

    /// Set the threshold, rejecting negative values.
    pub fn with_threshold(mut self, threshold: i64) -> Result<Self> {
        self.threshold = threshold_from(threshold)?;
        Ok(self)
    }

    /// Set case sensitivity.
    pub fn with_case_sensitivity(mut self, case_sensitivity: CaseSensitivity) -> Self {
        self.case_sensitivity = case_sensitivity;
        self
    }

    /// Set the drop-down height, rejecting negative or NaN values.
    pub fn with_max_drop_down_height(mut self, height: f64) -> Result<Self> {
        self.max_drop_down_height = validate_height(height)?;
        Ok(self)
    }
}

/// Convert a millisecond count into a delay.
pub fn delay_from_ms(delay_ms: i64) -> Result<Duration> {
    u64::try_from(delay_ms)
        .map(Duration::from_millis)
        .map_err(|_| TypeaheadError::NegativeDelay(delay_ms))
}

/// Convert a signed threshold into a character count.
pub fn threshold_from(threshold: i64) -> Result<usize> {
    usize::try_from(threshold).map_err(|_| TypeaheadError::NegativeThreshold(threshold))
}

pub(crate) fn validate_height(height: f64) -> Result<f64> {
    if height.is_nan() || height < 0.0 {
        Err(TypeaheadError::InvalidDropDownHeight(height))
    } else {
        Ok(height)
    }
}
