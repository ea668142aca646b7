//! The debounced auto-complete text box.
//!
//! [`AutoCompleteTextBox`] owns the query text, the candidate store and the
//! drop-down state. It consumes raw input from a presentation surface, defers
//! matching until typing pauses, and tells the surface what to show.
//!
//! # States
//!
//! ```text
//!            keystroke (delay > 0)            timer expiry, matches
//!   Idle ───────────────────────────▶ Pending ──────────────────────▶ Suggesting
//!    ▲  ◀───────────────────────────────┘ no matches                  │  │
//!    │                                                                │  │ keystroke
//!    │        selection / Enter with one row (committed)             │  ▼
//!    └────────────────────────────────────────────────────────────────┘ Pending
//! ```
//!
//! With a zero delay a keystroke runs the match cycle immediately and goes
//! straight to `Suggesting` or `Idle`.
//!
//! # Threading
//!
//! The control belongs to the thread that created it. Debounce expiries fire
//! on a timer thread and are posted to the control's event queue; they take
//! effect when the owner thread calls [`process_events`] or
//! [`wait_for_events`]. An expiry whose generation is no longer current, or
//! that arrives after [`dispose`], is dropped.
//!
//! [`process_events`]: AutoCompleteTextBox::process_events
//! [`wait_for_events`]: AutoCompleteTextBox::wait_for_events
//! [`dispose`]: AutoCompleteTextBox::dispose
//!
//! # Example
//!
//! ```
//! use typeahead::{AutoCompleteConfig, AutoCompleteTextBox, NullSurface};
//!
//! let config = AutoCompleteConfig::default().with_delay_ms(0)?;
//! let mut text_box = AutoCompleteTextBox::with_config(NullSurface, config)?;
//! text_box.set_candidates(vec!["apple", "apricot", "banana"]);
//!
//! text_box.on_user_input("ap");
//! assert!(text_box.is_drop_down_open());
//! assert_eq!(text_box.suggestions().len(), 2);
//!
//! text_box.on_item_selected(1)?;
//! assert_eq!(text_box.text(), "apricot");
//! assert!(!text_box.is_drop_down_open());
//! # Ok::<(), typeahead::TypeaheadError>(())
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use typeahead_core::logging::targets;
use typeahead_core::{
    DebounceTimer, EventPoster, EventQueue, ExpiryHandler, Generation, PerfSpan, Property, Result,
    Signal, ThreadAffinity, ThreadDebounceTimer, TypeaheadError,
};

use crate::candidates::CandidateStore;
use crate::config::{self, AutoCompleteConfig};
use crate::keys::Key;
use crate::matcher::{self, CaseSensitivity, Suggestion, SuggestionEntry};
use crate::surface::PresentationSurface;

/// Where the control is in its suggest cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AutoCompleteState {
    /// Drop-down closed, no timer armed.
    #[default]
    Idle,
    /// Timer armed, drop-down closed.
    Pending,
    /// Drop-down open with at least one suggestion.
    Suggesting,
}

/// Why the text field's content changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputOrigin {
    /// Unknown origin. Treated as typing unless it matches a field write the
    /// control is still waiting to see echoed.
    #[default]
    User,
    /// The surface knows this is the echo of [`PresentationSurface::set_field_text`].
    FieldWrite,
}

/// Events delivered to the control through its owner-thread queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// A debounce timer expired.
    DebounceElapsed(Generation),
    /// The text field's raw content changed.
    UserInput {
        /// The field's new content.
        text: String,
        /// Who changed it, if the surface knows.
        origin: InputOrigin,
    },
    /// A key was pressed in the text field.
    KeyPressed(Key),
    /// A drop-down row was picked.
    ItemSelected(usize),
}

/// A text input that suggests completions from a candidate list as the user
/// types, once typing pauses.
///
/// # Signals
///
/// - `text_changed(String)`: the public text value changed (typing, selection
///   or [`set_text`](Self::set_text))
/// - `committed(String)`: a suggestion was accepted
/// - `drop_down_toggled(bool)`: the drop-down opened or closed
pub struct AutoCompleteTextBox<S: PresentationSurface> {
    surface: S,
    text: Property<String>,
    candidates: Option<CandidateStore>,
    config: AutoCompleteConfig,

    state: AutoCompleteState,
    suggestions: Vec<Suggestion>,
    selected_index: Option<usize>,
    drop_down_open: bool,

    /// Field writes whose echo has not come back yet, oldest first. Echoes
    /// must not count as user input.
    pending_writes: VecDeque<String>,

    timer: Box<dyn DebounceTimer>,
    pending_generation: Option<Generation>,
    events: EventQueue<ControlEvent>,
    affinity: ThreadAffinity,
    disposed: bool,

    /// Signal emitted when the public text value changes.
    pub text_changed: Signal<String>,

    /// Signal emitted when a suggestion is committed.
    pub committed: Signal<String>,

    /// Signal emitted when the drop-down opens (`true`) or closes (`false`).
    pub drop_down_toggled: Signal<bool>,
}

impl<S: PresentationSurface> AutoCompleteTextBox<S> {
    /// Create a control with default configuration and a real-time timer.
    pub fn new(surface: S) -> Self {
        Self::build(surface, AutoCompleteConfig::default(), ThreadDebounceTimer::new)
    }

    /// Create a control with the given configuration and a real-time timer.
    pub fn with_config(surface: S, config: AutoCompleteConfig) -> Result<Self> {
        Self::with_timer(surface, config, ThreadDebounceTimer::new)
    }

    /// Create a control whose debounce timer is built by `make_timer`.
    ///
    /// `make_timer` receives the handler the timer must call on expiry. This
    /// is how hosts plug in a [`ManualClock`](typeahead_core::ManualClock).
    pub fn with_timer<T, F>(surface: S, config: AutoCompleteConfig, make_timer: F) -> Result<Self>
    where
        T: DebounceTimer + 'static,
        F: FnOnce(ExpiryHandler) -> T,
    {
        config.validate()?;
        Ok(Self::build(surface, config, make_timer))
    }

    fn build<T, F>(mut surface: S, config: AutoCompleteConfig, make_timer: F) -> Self
    where
        T: DebounceTimer + 'static,
        F: FnOnce(ExpiryHandler) -> T,
    {
        let events = EventQueue::new();
        let poster = events.poster();
        let handler: ExpiryHandler = Arc::new(move |generation| {
            // Fails only once the control is gone, which is fine.
            let _ = poster.post(ControlEvent::DebounceElapsed(generation));
        });

        surface.set_max_drop_down_height(config.max_drop_down_height);

        Self {
            surface,
            text: Property::default(),
            candidates: None,
            config,
            state: AutoCompleteState::Idle,
            suggestions: Vec::new(),
            selected_index: None,
            drop_down_open: false,
            pending_writes: VecDeque::new(),
            timer: Box::new(make_timer(handler)),
            pending_generation: None,
            affinity: events.affinity(),
            events,
            disposed: false,
            text_changed: Signal::new(),
            committed: Signal::new(),
            drop_down_toggled: Signal::new(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// The public text value.
    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Set the text programmatically.
    ///
    /// The field is updated without triggering a match cycle, any pending
    /// cycle is cancelled and the drop-down is closed.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.ensure_live()?;
        let text = text.into();

        self.cancel_pending();
        self.close_drop_down();
        self.write_field(&text);
        self.transition(AutoCompleteState::Idle);
        Ok(())
    }

    /// The current candidate store, if any.
    pub fn candidate_source(&self) -> Option<&CandidateStore> {
        self.candidates.as_ref()
    }

    /// Replace the candidate store. `None` means "no matches".
    ///
    /// Takes effect on the next match cycle; a cycle that is already pending
    /// is neither cancelled nor restarted.
    pub fn set_candidate_source(&mut self, source: Option<CandidateStore>) {
        tracing::debug!(
            target: targets::CONTROL,
            candidates = source.as_ref().map(CandidateStore::len),
            "candidate source replaced"
        );
        self.candidates = source;
    }

    /// Replace the candidate store with `candidates`.
    pub fn set_candidates(&mut self, candidates: impl Into<CandidateStore>) {
        self.set_candidate_source(Some(candidates.into()));
    }

    /// The active configuration.
    pub fn config(&self) -> &AutoCompleteConfig {
        &self.config
    }

    /// The debounce delay.
    pub fn delay(&self) -> Duration {
        self.config.delay
    }

    /// Set the debounce delay. Zero matches synchronously.
    pub fn set_delay(&mut self, delay: Duration) {
        self.config.delay = delay;
    }

    /// Set the debounce delay in milliseconds, rejecting negative values.
    pub fn set_delay_ms(&mut self, delay_ms: i64) -> Result<()> {
        self.config.delay = config::delay_from_ms(delay_ms)?;
        Ok(())
    }

    /// The minimum query length before matching happens.
    pub fn threshold(&self) -> usize {
        self.config.threshold
    }

    /// Set the minimum query length, rejecting negative values.
    pub fn set_threshold(&mut self, threshold: i64) -> Result<()> {
        self.config.threshold = config::threshold_from(threshold)?;
        Ok(())
    }

    /// How letter case is compared.
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.config.case_sensitivity
    }

    /// Set how letter case is compared.
    pub fn set_case_sensitivity(&mut self, case_sensitivity: CaseSensitivity) {
        self.config.case_sensitivity = case_sensitivity;
    }

    /// The maximum drop-down height passed to the surface.
    pub fn max_drop_down_height(&self) -> f64 {
        self.config.max_drop_down_height
    }

    /// Set the maximum drop-down height, rejecting negative or NaN values.
    pub fn set_max_drop_down_height(&mut self, height: f64) -> Result<()> {
        self.config.max_drop_down_height = config::validate_height(height)?;
        self.surface.set_max_drop_down_height(height);
        Ok(())
    }

    // =========================================================================
    // Observable state
    // =========================================================================

    /// The current state.
    pub fn state(&self) -> AutoCompleteState {
        self.state
    }

    /// Whether the drop-down is open.
    pub fn is_drop_down_open(&self) -> bool {
        self.drop_down_open
    }

    /// The suggestions currently shown. Empty while the drop-down is closed.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// The highlighted row, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// A poster for surfaces that deliver input from another thread.
    pub fn poster(&self) -> EventPoster<ControlEvent> {
        self.events.poster()
    }

    /// Number of events waiting for [`process_events`](Self::process_events).
    pub fn pending_event_count(&self) -> usize {
        self.events.pending_count()
    }

    /// The presentation surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The presentation surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // =========================================================================
    // Input from the surface
    // =========================================================================

    /// The text field's raw content changed.
    ///
    /// Content equal to an outstanding field write is taken as that write's
    /// echo and ignored, along with any older writes. Anything else is typing
    /// and discards all outstanding writes.
    pub fn on_user_input(&mut self, text: impl Into<String>) {
        if self.disposed {
            return;
        }
        self.affinity.debug_check();
        let text = text.into();

        if self.consume_echo(&text) {
            return;
        }
        if !self.pending_writes.is_empty() {
            tracing::trace!(
                target: targets::CONTROL,
                outstanding = self.pending_writes.len(),
                "typing supersedes unechoed field writes"
            );
            self.pending_writes.clear();
        }

        if self.text.set(text.clone()) {
            self.text_changed.emit(text);
        }

        if self.config.delay.is_zero() {
            self.cancel_pending();
            self.run_match_cycle();
        } else {
            self.close_drop_down();
            let generation = self.timer.start(self.config.delay);
            self.pending_generation = Some(generation);
            self.transition(AutoCompleteState::Pending);
        }
    }

    /// The surface reports the echo of a field write.
    ///
    /// Never starts a match cycle, even if no matching write is outstanding.
    pub fn on_field_echo(&mut self, text: impl Into<String>) {
        if self.disposed {
            return;
        }
        self.affinity.debug_check();
        let text = text.into();

        if !self.consume_echo(&text) {
            tracing::trace!(target: targets::CONTROL, "unmatched field echo ignored");
        }
    }

    /// A key was pressed in the text field.
    ///
    /// Returns `true` if the key changed the control's state.
    pub fn on_key_pressed(&mut self, key: Key) -> bool {
        if self.disposed || !self.drop_down_open {
            return false;
        }
        self.affinity.debug_check();

        match key {
            _ if key.is_accept() => {
                let single = self.suggestions.len() == 1;
                match self.selected_index.or(single.then_some(0)) {
                    Some(index) => self.commit(index),
                    None => {
                        tracing::debug!(
                            target: targets::CONTROL,
                            shown = self.suggestions.len(),
                            "accept key with ambiguous drop-down, closing"
                        );
                        self.close_drop_down();
                        self.transition(AutoCompleteState::Idle);
                    }
                }
                true
            }
            Key::Escape => {
                self.close_drop_down();
                self.transition(AutoCompleteState::Idle);
                true
            }
            _ if key.is_navigation() => {
                self.move_highlight(key == Key::ArrowDown);
                true
            }
            _ => false,
        }
    }

    /// The user picked the drop-down row at `index`.
    pub fn on_item_selected(&mut self, index: usize) -> Result<()> {
        self.ensure_live()?;
        if index >= self.suggestions.len() {
            return Err(TypeaheadError::IndexOutOfRange {
                index,
                len: self.suggestions.len(),
            });
        }
        self.commit(index);
        Ok(())
    }

    // =========================================================================
    // Event processing
    // =========================================================================

    /// Handle every queued event. Returns how many were handled.
    ///
    /// Call this on the owner thread whenever the host's event loop turns.
    pub fn process_events(&mut self) -> usize {
        let events = self.events.drain();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    /// Block for at most `timeout` until an event arrives, then handle it and
    /// everything queued behind it. Returns how many were handled.
    pub fn wait_for_events(&mut self, timeout: Duration) -> usize {
        match self.events.wait(timeout) {
            Some(event) => {
                self.handle_event(event);
                1 + self.process_events()
            }
            None => 0,
        }
    }

    /// Handle one event as if it had come through the queue.
    pub fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::DebounceElapsed(generation) => self.on_debounce_elapsed(generation),
            ControlEvent::UserInput {
                text,
                origin: InputOrigin::User,
            } => self.on_user_input(text),
            ControlEvent::UserInput {
                text,
                origin: InputOrigin::FieldWrite,
            } => self.on_field_echo(text),
            ControlEvent::KeyPressed(key) => {
                self.on_key_pressed(key);
            }
            ControlEvent::ItemSelected(index) => {
                if let Err(err) = self.on_item_selected(index) {
                    tracing::debug!(target: targets::CONTROL, %err, "queued selection ignored");
                }
            }
        }
    }

    fn on_debounce_elapsed(&mut self, generation: Generation) {
        if self.disposed {
            tracing::trace!(target: targets::CONTROL, "expiry after dispose dropped");
            return;
        }
        if self.state != AutoCompleteState::Pending || self.pending_generation != Some(generation) {
            tracing::trace!(
                target: targets::CONTROL,
                generation = generation.get(),
                "stale expiry dropped"
            );
            return;
        }
        self.run_match_cycle();
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Stop the timer, close the drop-down and ignore everything afterwards.
    ///
    /// Idempotent. Runs automatically on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_pending();
        self.close_drop_down();
        self.transition(AutoCompleteState::Idle);
        self.disposed = true;
        self.pending_writes.clear();

        let dropped = self.events.drain().len();
        tracing::debug!(target: targets::CONTROL, dropped, "control disposed");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            return Err(TypeaheadError::Disposed);
        }
        self.affinity.debug_check();
        Ok(())
    }

    fn run_match_cycle(&mut self) {
        let _span = PerfSpan::new("match_cycle");
        self.pending_generation = None;

        let matches = self.text.with(|query| {
            matcher::match_candidates(
                query,
                self.candidates.as_ref(),
                self.config.threshold,
                self.config.case_sensitivity,
            )
        });

        self.suggestions = matches;
        self.selected_index = None;
        let entries: Vec<SuggestionEntry> =
            self.suggestions.iter().map(Suggestion::to_entry).collect();
        self.surface.render_suggestions(&entries);
        self.surface.set_selected_index(None);

        if self.suggestions.is_empty() {
            self.set_drop_down_open(false);
            self.transition(AutoCompleteState::Idle);
        } else {
            self.set_drop_down_open(true);
            self.transition(AutoCompleteState::Suggesting);
        }
    }

    fn commit(&mut self, index: usize) {
        let value = self.suggestions[index].value().to_string();

        self.cancel_pending();
        self.write_field(&value);
        self.close_drop_down();
        tracing::debug!(target: targets::CONTROL, value = %value, "suggestion committed");
        self.committed.emit(value);
        self.transition(AutoCompleteState::Idle);
    }

    /// Write `text` to the field and the public value without it counting as
    /// user input.
    fn write_field(&mut self, text: &str) {
        if self.surface.echoes_field_writes() {
            self.pending_writes.push_back(text.to_string());
        }
        self.surface.set_field_text(text);
        if self.text.set(text.to_string()) {
            self.text_changed.emit(text.to_string());
        }
    }

    /// Drop `text`'s outstanding write and every older one. Returns whether
    /// `text` was outstanding.
    fn consume_echo(&mut self, text: &str) -> bool {
        match self.pending_writes.iter().position(|write| write == text) {
            Some(position) => {
                self.pending_writes.drain(..=position);
                tracing::trace!(target: targets::CONTROL, "field echo of own write ignored");
                true
            }
            None => false,
        }
    }

    /// Move the highlight one row, wrapping at either end.
    fn move_highlight(&mut self, down: bool) {
        let last = self.suggestions.len() - 1;
        let next = match (self.selected_index, down) {
            (Some(index), true) if index < last => index + 1,
            (_, true) => 0,
            (Some(index), false) if index > 0 => index - 1,
            (_, false) => last,
        };
        self.selected_index = Some(next);
        self.surface.set_selected_index(Some(next));
    }

    fn cancel_pending(&mut self) {
        self.timer.stop();
        self.pending_generation = None;
    }

    fn close_drop_down(&mut self) {
        if !self.suggestions.is_empty() {
            self.suggestions.clear();
            self.surface.render_suggestions(&[]);
        }
        if self.selected_index.take().is_some() {
            self.surface.set_selected_index(None);
        }
        self.set_drop_down_open(false);
    }

    fn set_drop_down_open(&mut self, open: bool) {
        if self.drop_down_open != open {
            self.drop_down_open = open;
            self.surface.set_drop_down_open(open);
            self.drop_down_toggled.emit(open);
        }
    }

    fn transition(&mut self, next: AutoCompleteState) {
        if self.state != next {
            tracing::debug!(target: targets::CONTROL, from = ?self.state, to = ?next, "state change");
            self.state = next;
        }
    }
}

impl<S: PresentationSurface> Drop for AutoCompleteTextBox<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S: PresentationSurface> std::fmt::Debug for AutoCompleteTextBox<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoCompleteTextBox")
            .field("text", &self.text.get())
            .field("state", &self.state)
            .field("drop_down_open", &self.drop_down_open)
            .field("suggestions", &self.suggestions.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullSurface;
    use typeahead_core::{ManualClock, ManualDebounceTimer};

    fn manual_box(delay_ms: i64) -> (AutoCompleteTextBox<NullSurface>, ManualClock) {
        let clock = ManualClock::new();
        let config = AutoCompleteConfig::default().with_delay_ms(delay_ms).unwrap();
        let timer_clock = clock.clone();
        let text_box = AutoCompleteTextBox::with_timer(NullSurface, config, move |handler| {
            ManualDebounceTimer::new(&timer_clock, handler)
        })
        .unwrap();
        (text_box, clock)
    }

    #[test]
    fn test_keystroke_arms_pending() {
        let (mut text_box, clock) = manual_box(500);
        text_box.set_candidates(vec!["apple"]);

        text_box.on_user_input("a");
        assert_eq!(text_box.state(), AutoCompleteState::Pending);
        assert_eq!(clock.pending_timers(), 1);
        assert!(!text_box.is_drop_down_open());
    }

    #[test]
    fn test_expiry_needs_owner_thread_processing() {
        let (mut text_box, clock) = manual_box(500);
        text_box.set_candidates(vec!["apple"]);

        text_box.on_user_input("a");
        clock.advance(Duration::from_millis(500));
        assert_eq!(text_box.state(), AutoCompleteState::Pending);
        assert_eq!(text_box.pending_event_count(), 1);

        assert_eq!(text_box.process_events(), 1);
        assert_eq!(text_box.state(), AutoCompleteState::Suggesting);
    }

    #[test]
    fn test_stale_generation_ignored() {
        let (mut text_box, _clock) = manual_box(500);
        text_box.set_candidates(vec!["apple"]);

        text_box.on_user_input("a");
        text_box.handle_event(ControlEvent::DebounceElapsed(Generation::NONE));
        assert_eq!(text_box.state(), AutoCompleteState::Pending);
    }

    #[test]
    fn test_arrow_navigation_wraps() {
        let (mut text_box, _clock) = manual_box(0);
        text_box.set_candidates(vec!["a1", "a2", "a3"]);
        text_box.on_user_input("a");

        assert!(text_box.on_key_pressed(Key::ArrowDown));
        assert_eq!(text_box.selected_index(), Some(0));
        text_box.on_key_pressed(Key::ArrowUp);
        assert_eq!(text_box.selected_index(), Some(2));
        text_box.on_key_pressed(Key::ArrowDown);
        assert_eq!(text_box.selected_index(), Some(0));
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let (mut text_box, _clock) = manual_box(0);
        assert!(!text_box.on_key_pressed(Key::Enter));
        assert!(!text_box.on_key_pressed(Key::ArrowDown));
        assert!(!text_box.on_key_pressed(Key::Escape));
    }

    #[test]
    fn test_rejected_config_leaves_value() {
        let (mut text_box, _clock) = manual_box(500);
        assert_eq!(text_box.set_delay_ms(-10), Err(TypeaheadError::NegativeDelay(-10)));
        assert_eq!(text_box.delay(), Duration::from_millis(500));
        assert_eq!(text_box.set_threshold(-1), Err(TypeaheadError::NegativeThreshold(-1)));
        assert_eq!(text_box.threshold(), 1);
        assert!(text_box.set_max_drop_down_height(f64::NAN).is_err());
        assert_eq!(text_box.max_drop_down_height(), 150.0);
    }
}
