//! Owner-thread event queue for cross-thread delivery.
//!
//! Timer callbacks fire on their own thread but must not touch control state.
//! Instead they post an event through an [`EventPoster`]; the owner (UI) thread
//! later drains the matching [`EventQueue`] and handles each event itself.
//!
//! # How It Works
//!
//! 1. The owner thread creates an `EventQueue` and hands out posters.
//! 2. Any thread posts events; posting never blocks.
//! 3. The owner thread drains the queue with [`EventQueue::drain`] or waits for
//!    the next event with [`EventQueue::wait`].
//!
//! Once the queue is dropped every poster fails with
//! [`TypeaheadError::QueueClosed`], which lets late producers notice that the
//! receiving control is gone.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::error::{Result, TypeaheadError};
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

/// A cloneable, thread-safe handle that posts events to an [`EventQueue`].
pub struct EventPoster<E> {
    sender: Sender<E>,
}

impl<E> Clone for EventPoster<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E> EventPoster<E> {
    /// Post an event to the owner thread.
    ///
    /// Returns [`TypeaheadError::QueueClosed`] if the queue has been dropped.
    pub fn post(&self, event: E) -> Result<()> {
        self.sender.send(event).map_err(|_| {
            tracing::trace!(target: targets::QUEUE, "post to closed queue dropped");
            TypeaheadError::QueueClosed
        })
    }
}

impl<E> std::fmt::Debug for EventPoster<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPoster")
            .field("pending", &self.sender.len())
            .finish()
    }
}

/// The receiving side of an owner-thread event queue.
///
/// Events are delivered in the order they were posted (FIFO per poster).
pub struct EventQueue<E> {
    receiver: Receiver<E>,
    sender: Sender<E>,
    affinity: ThreadAffinity,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    /// Create a new queue owned by the current thread.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            receiver,
            sender,
            affinity: ThreadAffinity::current(),
        }
    }

    /// Get a poster that can be sent to other threads.
    pub fn poster(&self) -> EventPoster<E> {
        EventPoster {
            sender: self.sender.clone(),
        }
    }

    /// The thread this queue delivers on.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Number of events waiting to be handled.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Take every event that is currently queued.
    pub fn drain(&self) -> Vec<E> {
        self.affinity.debug_check();
        let events: Vec<E> = self.receiver.try_iter().collect();
        if !events.is_empty() {
            tracing::trace!(target: targets::QUEUE, count = events.len(), "drained events");
        }
        events
    }

    /// Block for at most `timeout` waiting for the next event.
    pub fn wait(&self, timeout: Duration) -> Option<E> {
        self.affinity.debug_check();
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl<E> std::fmt::Debug for EventQueue<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.receiver.len())
            .field("affinity", &self.affinity)
            .finish()
    }
}

static_assertions::assert_impl_all!(EventPoster<u64>: Send, Sync, Clone);
