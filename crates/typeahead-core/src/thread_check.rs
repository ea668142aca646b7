//! Owner-thread checks.
//!
//! Query text, candidates and drop-down state live on the thread that built
//! the control. Timer threads only ever post to the event queue, and the
//! owner drains it. [`ThreadAffinity`] pins that owner so owner-only entry
//! points can catch a stray call from a timer or worker thread.
//!
//! ```
//! use typeahead_core::thread_check::ThreadAffinity;
//!
//! let owner = ThreadAffinity::current();
//! assert!(owner.is_owner_thread());
//!
//! let elsewhere = std::thread::spawn(move || owner.is_owner_thread()).join().unwrap();
//! assert!(!elsewhere);
//! ```

use std::thread::{self, ThreadId};

/// The thread that owns a piece of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Pin ownership to the calling thread.
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    /// The owning thread.
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Whether the caller runs on the owning thread.
    #[inline]
    pub fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic unless called on the owning thread.
    #[inline]
    #[track_caller]
    pub fn check(&self) {
        if !self.is_owner_thread() {
            self.wrong_thread();
        }
    }

    /// [`check`](Self::check) in debug builds, nothing in release builds.
    #[inline]
    #[track_caller]
    pub fn debug_check(&self) {
        #[cfg(debug_assertions)]
        self.check();
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn wrong_thread(&self) -> ! {
        let caller = thread::current();
        panic!(
            "owner-thread state touched from thread {:?} ({:?}), owner is {:?}; \
             post a ControlEvent and drain it with process_events() instead",
            caller.name().unwrap_or("<unnamed>"),
            caller.id(),
            self.owner,
        )
    }
}
