//! The presentation surface seam.
//!
//! The control never draws anything. It tells a [`PresentationSurface`] what
//! to show, and the host feeds raw input back through the control's
//! `on_user_input`, `on_key_pressed` and `on_item_selected` methods (or, for
//! surfaces living on another thread, by posting
//! [`ControlEvent`](crate::ControlEvent)s).

use crate::matcher::SuggestionEntry;

/// Rendering capabilities the auto-complete control needs from a UI toolkit.
pub trait PresentationSurface {
    /// Replace the drop-down rows.
    fn render_suggestions(&mut self, entries: &[SuggestionEntry]);

    /// Open or close the drop-down.
    fn set_drop_down_open(&mut self, open: bool);

    /// Highlight a row, or none.
    fn set_selected_index(&mut self, index: Option<usize>);

    /// Write the text field's displayed content.
    ///
    /// Surfaces whose toolkit reports this write back as a text change should
    /// forward that echo to `on_field_echo`, or to `on_user_input` if they
    /// cannot tell it apart from typing; the control recognizes and swallows
    /// it either way.
    fn set_field_text(&mut self, text: &str);

    /// Whether every [`set_field_text`](Self::set_field_text) comes back as a
    /// text change. Return `false` if the toolkit writes silently, so the
    /// control does not wait for echoes that never arrive.
    fn echoes_field_writes(&self) -> bool {
        true
    }

    /// Maximum drop-down height, in the toolkit's units. Purely visual.
    fn set_max_drop_down_height(&mut self, _height: f64) {}
}

/// A surface that renders nothing, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl PresentationSurface for NullSurface {
    fn render_suggestions(&mut self, _entries: &[SuggestionEntry]) {}

    fn set_drop_down_open(&mut self, _open: bool) {}

    fn set_selected_index(&mut self, _index: Option<usize>) {}

    fn set_field_text(&mut self, _text: &str) {}

    fn echoes_field_writes(&self) -> bool {
        false
    }
}
