//! Property system for Typeahead.
//!
//! A [`Property`] wraps a value and reports whether an assignment actually
//! changed it, so callers emit their change signal only on real changes.
//!
//! # Example
//!
//! ```
//! use typeahead_core::{Property, Signal};
//!
//! struct Field {
//!     text: Property<String>,
//!     text_changed: Signal<String>,
//! }
//!
//! impl Field {
//!     fn set_text(&self, text: &str) {
//!         if self.text.set(text.to_string()) {
//!             self.text_changed.emit(text.to_string());
//!         }
//!     }
//! }
//!
//! let field = Field { text: Property::default(), text_changed: Signal::new() };
//! field.set_text("ap");
//! assert_eq!(field.text.get(), "ap");
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()` instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
