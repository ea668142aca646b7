//! Signal/slot system for Typeahead.
//!
//! Signals let a control announce state changes (text edited, suggestion
//! committed, drop-down toggled) to any number of host callbacks without the
//! control knowing who listens.
//!
//! # Delivery
//!
//! Slots are invoked synchronously, on the emitting thread, in the order they
//! were connected. The controls in this workspace only emit from their owner
//! (UI) thread, so slots observe the same single-writer discipline as the
//! control itself.
//!
//! # Example
//!
//! ```
//! use typeahead_core::Signal;
//!
//! let committed = Signal::<String>::new();
//!
//! let conn_id = committed.connect(|value| {
//!     println!("Committed: {}", value);
//! });
//!
//! committed.emit("apricot".to_string());
//! committed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple for several.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// The slot list is snapshotted before any slot runs, so a slot may
    /// connect or disconnect on this same signal. Such changes take effect
    /// from the next emission.
    #[tracing::instrument(skip_all, target = "typeahead_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::Relaxed))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.lock(), vec![1, 3]);
    }

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let order_clone = order.clone();
            signal.connect(move |_| order_clone.lock().push(i));
        }

        assert_eq!(signal.connection_count(), 3);
        signal.emit(());
        assert_eq!(*order.lock(), vec![0, 1, 2]);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_may_reconnect_during_emit() {
        let signal = Arc::new(Signal::<String>::new());
        let count = Arc::new(Mutex::new(0));

        let signal_clone = signal.clone();
        let count_clone = count.clone();
        signal.connect(move |_| {
            *count_clone.lock() += 1;
            let inner = count_clone.clone();
            signal_clone.connect(move |_| *inner.lock() += 10);
        });

        signal.emit("first".to_string());
        assert_eq!(*count.lock(), 1);
        assert_eq!(signal.connection_count(), 2);
    }

    #[test]
    fn test_emit_from_other_thread() {
        let signal = Arc::new(Signal::<i32>::new());
        let slot_thread = Arc::new(Mutex::new(None));

        let slot_thread_clone = slot_thread.clone();
        signal.connect(move |_| {
            *slot_thread_clone.lock() = Some(std::thread::current().id());
        });

        let signal_clone = signal.clone();
        let emitter = std::thread::spawn(move || {
            signal_clone.emit(7);
            std::thread::current().id()
        })
        .join()
        .unwrap();

        assert_eq!(*slot_thread.lock(), Some(emitter));
    }
}
