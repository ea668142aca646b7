//! Keys the auto-complete control reacts to.
//!
//! Surfaces translate their toolkit's key events into [`Key`]; anything the
//! control does not handle maps to [`Key::Character`] or [`Key::Unknown`] and
//! is ignored.

/// Keyboard key codes relevant to the auto-complete control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return on the main keyboard.
    Enter,
    /// Enter on the numeric keypad.
    NumpadEnter,
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// A printable character key.
    Character(char),
    /// Unknown/unmapped key.
    Unknown(u16),
}

impl Key {
    /// Check if this key accepts or dismisses the drop-down (Enter/Return/Tab).
    pub fn is_accept(&self) -> bool {
        matches!(self, Key::Enter | Key::NumpadEnter | Key::Tab)
    }

    /// Check if this key moves the highlighted suggestion.
    pub fn is_navigation(&self) -> bool {
        matches!(self, Key::ArrowUp | Key::ArrowDown)
    }
}
