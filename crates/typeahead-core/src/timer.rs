//! Debounce timer system for Typeahead.
//!
//! A debounce timer is a single-shot, restartable delay. Every call to
//! [`DebounceTimer::start`] cancels whatever was armed before and issues a new
//! [`Generation`]; only the most recent generation may ever fire. The
//! generation check also makes teardown safe: once a timer is stopped or
//! dropped, an expiry that was already in flight sees a stale generation and
//! is discarded.
//!
//! Two implementations are provided:
//!
//! - [`ThreadDebounceTimer`]: real time, one dedicated timer thread per timer.
//!   The expiry handler runs on that thread and must hand work back to the
//!   owner thread (see [`crate::queue`]).
//! - [`ManualDebounceTimer`]: virtual time driven by a shared [`ManualClock`],
//!   for deterministic tests and headless hosts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use parking_lot::Mutex;

use crate::logging::targets;

/// Identifies one `start` call on a debounce timer.
///
/// Generations are strictly increasing per timer. [`Generation::NONE`] is
/// never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Placeholder for "no generation issued yet".
    pub const NONE: Generation = Generation(0);

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Callback invoked when a timer expires, with the generation that fired.
pub type ExpiryHandler = Arc<dyn Fn(Generation) + Send + Sync>;

/// A single-shot, restartable delay timer.
pub trait DebounceTimer: Send {
    /// Arm the timer to fire after `delay`, replacing any armed deadline.
    ///
    /// A deadline the clock cannot represent never comes; the timer stays
    /// armed until stopped or restarted.
    fn start(&mut self, delay: Duration) -> Generation;

    /// Cancel the armed deadline, if any. Idempotent.
    fn stop(&mut self);

    /// Whether a deadline is currently armed.
    fn is_armed(&self) -> bool;

    /// The generation issued by the most recent `start`.
    fn current_generation(&self) -> Generation;
}

/// Generation bookkeeping shared between a timer handle and whatever fires it.
#[derive(Debug, Default)]
struct TimerSlot {
    /// Last generation handed out.
    issued: AtomicU64,
    /// Generation that may still fire, or 0.
    armed: AtomicU64,
}

impl TimerSlot {
    fn arm(&self) -> Generation {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.armed.store(generation, Ordering::SeqCst);
        Generation(generation)
    }

    fn disarm(&self) {
        self.armed.store(0, Ordering::SeqCst);
    }

    /// Claim the right to fire `generation`. Succeeds at most once per generation.
    fn try_fire(&self, generation: Generation) -> bool {
        self.armed
            .compare_exchange(generation.0, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst) != 0
    }

    fn current(&self) -> Generation {
        Generation(self.issued.load(Ordering::SeqCst))
    }
}

// ============================================================================
// Thread-backed timer
// ============================================================================

enum TimerCommand {
    Arm {
        generation: Generation,
        deadline: Instant,
    },
    Disarm,
    Shutdown,
}

/// A debounce timer backed by a dedicated timer thread.
///
/// The expiry handler runs on the timer thread, never on the thread that
/// called `start`.
pub struct ThreadDebounceTimer {
    commands: Sender<TimerCommand>,
    slot: Arc<TimerSlot>,
}

impl ThreadDebounceTimer {
    /// Spawn the timer thread and register the expiry handler.
    pub fn new(handler: ExpiryHandler) -> Self {
        Self::with_name("typeahead-debounce", handler)
    }

    /// Like [`new`](Self::new) with a custom timer thread name.
    pub fn with_name(name: impl Into<String>, handler: ExpiryHandler) -> Self {
        let (commands, receiver) = unbounded();
        let slot = Arc::new(TimerSlot::default());

        let thread_slot = slot.clone();
        thread::Builder::new()
            .name(name.into())
            .spawn(move || timer_loop(receiver, thread_slot, handler))
            .expect("Failed to spawn debounce timer thread");

        Self { commands, slot }
    }
}

impl DebounceTimer for ThreadDebounceTimer {
    fn start(&mut self, delay: Duration) -> Generation {
        let generation = self.slot.arm();
        let command = match Instant::now().checked_add(delay) {
            Some(deadline) => {
                tracing::trace!(target: targets::TIMER, generation = generation.get(), ?delay, "timer armed");
                TimerCommand::Arm {
                    generation,
                    deadline,
                }
            }
            None => {
                tracing::trace!(target: targets::TIMER, generation = generation.get(), ?delay, "deadline out of range, timer will not fire");
                TimerCommand::Disarm
            }
        };
        // A closed channel means the timer thread is gone; nothing can fire then.
        let _ = self.commands.send(command);
        generation
    }

    fn stop(&mut self) {
        if self.slot.is_armed() {
            tracing::trace!(target: targets::TIMER, "timer stopped");
        }
        self.slot.disarm();
        let _ = self.commands.send(TimerCommand::Disarm);
    }

    fn is_armed(&self) -> bool {
        self.slot.is_armed()
    }

    fn current_generation(&self) -> Generation {
        self.slot.current()
    }
}

impl Drop for ThreadDebounceTimer {
    fn drop(&mut self) {
        self.slot.disarm();
        // Don't block in drop - just request shutdown
        let _ = self.commands.send(TimerCommand::Shutdown);
    }
}

impl std::fmt::Debug for ThreadDebounceTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadDebounceTimer")
            .field("armed", &self.slot.is_armed())
            .field("generation", &self.slot.current())
            .finish()
    }
}

fn timer_loop(commands: Receiver<TimerCommand>, slot: Arc<TimerSlot>, handler: ExpiryHandler) {
    let mut pending: Option<(Generation, Instant)> = None;

    loop {
        let command = match pending {
            Some((_, deadline)) => commands.recv_deadline(deadline),
            None => commands.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match command {
            Ok(TimerCommand::Arm {
                generation,
                deadline,
            }) => pending = Some((generation, deadline)),
            Ok(TimerCommand::Disarm) => pending = None,
            Ok(TimerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                let Some((generation, _)) = pending.take() else {
                    continue;
                };
                if slot.try_fire(generation) {
                    tracing::trace!(target: targets::TIMER, generation = generation.get(), "timer fired");
                    handler(generation);
                } else {
                    tracing::trace!(target: targets::TIMER, generation = generation.get(), "stale expiry dropped");
                }
            }
        }
    }

    tracing::trace!(target: targets::TIMER, "timer thread exiting");
}

// ============================================================================
// Virtual-time timer
// ============================================================================

struct ManualEntry {
    timer: u64,
    deadline: Duration,
    generation: Generation,
    slot: Arc<TimerSlot>,
    handler: ExpiryHandler,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_timer: u64,
    entries: Vec<ManualEntry>,
}

/// A virtual clock shared by any number of [`ManualDebounceTimer`]s.
///
/// Time only moves when [`advance`](Self::advance) is called. Due timers fire
/// on the calling thread, earliest deadline first.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::time::Duration;
/// use typeahead_core::timer::{DebounceTimer, ManualClock, ManualDebounceTimer};
///
/// let clock = ManualClock::new();
/// let fired = Arc::new(AtomicU64::new(0));
/// let fired_clone = fired.clone();
/// let mut timer = ManualDebounceTimer::new(&clock, Arc::new(move |generation| {
///     fired_clone.store(generation.get(), Ordering::SeqCst);
/// }));
///
/// timer.start(Duration::from_millis(500));
/// clock.advance(Duration::from_millis(499));
/// assert_eq!(fired.load(Ordering::SeqCst), 0);
/// clock.advance(Duration::from_millis(1));
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ClockState>>,
}

impl ManualClock {
    /// Create a clock at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of timers currently waiting on this clock.
    pub fn pending_timers(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Move virtual time forward by `step`, firing every timer that comes due.
    ///
    /// Handlers run without the clock lock held, so they may arm or stop
    /// timers on this clock.
    pub fn advance(&self, step: Duration) {
        let target = self.state.lock().now.saturating_add(step);

        loop {
            let due = {
                let mut state = self.state.lock();
                let next = state
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.deadline <= target)
                    .min_by_key(|(_, entry)| entry.deadline)
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let entry = state.entries.remove(index);
                        state.now = entry.deadline;
                        entry
                    }
                    None => {
                        state.now = target;
                        break;
                    }
                }
            };

            if due.slot.try_fire(due.generation) {
                tracing::trace!(
                    target: targets::TIMER,
                    generation = due.generation.get(),
                    at = ?due.deadline,
                    "manual timer fired"
                );
                (due.handler)(due.generation);
            }
        }
    }

    fn register(&self) -> u64 {
        let mut state = self.state.lock();
        state.next_timer += 1;
        state.next_timer
    }

    fn schedule(&self, entry: ManualEntry) {
        let mut state = self.state.lock();
        state.entries.retain(|existing| existing.timer != entry.timer);
        state.entries.push(entry);
    }

    fn cancel(&self, timer: u64) {
        self.state.lock().entries.retain(|entry| entry.timer != timer);
    }

    fn deadline_after(&self, delay: Duration) -> Option<Duration> {
        self.state.lock().now.checked_add(delay)
    }
}

impl std::fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualClock")
            .field("now", &state.now)
            .field("pending", &state.entries.len())
            .finish()
    }
}

/// A debounce timer that runs on a [`ManualClock`].
pub struct ManualDebounceTimer {
    clock: ManualClock,
    id: u64,
    slot: Arc<TimerSlot>,
    handler: ExpiryHandler,
}

impl ManualDebounceTimer {
    /// Create a timer on `clock` with the given expiry handler.
    pub fn new(clock: &ManualClock, handler: ExpiryHandler) -> Self {
        Self {
            clock: clock.clone(),
            id: clock.register(),
            slot: Arc::new(TimerSlot::default()),
            handler,
        }
    }
}

impl DebounceTimer for ManualDebounceTimer {
    fn start(&mut self, delay: Duration) -> Generation {
        let generation = self.slot.arm();
        match self.clock.deadline_after(delay) {
            Some(deadline) => self.clock.schedule(ManualEntry {
                timer: self.id,
                deadline,
                generation,
                slot: self.slot.clone(),
                handler: self.handler.clone(),
            }),
            None => self.clock.cancel(self.id),
        }
        generation
    }

    fn stop(&mut self) {
        self.slot.disarm();
        self.clock.cancel(self.id);
    }

    fn is_armed(&self) -> bool {
        self.slot.is_armed()
    }

    fn current_generation(&self) -> Generation {
        self.slot.current()
    }
}

impl Drop for ManualDebounceTimer {
    fn drop(&mut self) {
        self.slot.disarm();
        self.clock.cancel(self.id);
    }
}

impl std::fmt::Debug for ManualDebounceTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualDebounceTimer")
            .field("id", &self.id)
            .field("armed", &self.slot.is_armed())
            .field("generation", &self.slot.current())
            .finish()
    }
}

static_assertions::assert_impl_all!(ThreadDebounceTimer: Send);
static_assertions::assert_impl_all!(ManualDebounceTimer: Send);
static_assertions::assert_impl_all!(ManualClock: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_handler() -> (ExpiryHandler, Arc<Mutex<Vec<Generation>>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let fired_clone = fired.clone();
        let handler: ExpiryHandler = Arc::new(move |generation| fired_clone.lock().push(generation));
        (handler, fired)
    }

    #[test]
    fn test_slot_fires_once_per_generation() {
        let slot = TimerSlot::default();
        let first = slot.arm();
        let second = slot.arm();

        assert!(second > first);
        assert!(!slot.try_fire(first));
        assert!(slot.try_fire(second));
        assert!(!slot.try_fire(second));
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_manual_restart_replaces_deadline() {
        let clock = ManualClock::new();
        let (handler, fired) = recording_handler();
        let mut timer = ManualDebounceTimer::new(&clock, handler);

        for _ in 0..4 {
            timer.start(Duration::from_millis(500));
            clock.advance(Duration::from_millis(50));
        }
        assert_eq!(clock.pending_timers(), 1);

        clock.advance(Duration::from_millis(449));
        assert!(fired.lock().is_empty());

        clock.advance(Duration::from_millis(1));
        assert_eq!(*fired.lock(), vec![Generation(4)]);
        assert_eq!(clock.now(), Duration::from_millis(650));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_unrepresentable_deadline_never_fires() {
        let clock = ManualClock::new();
        let (handler, fired) = recording_handler();
        let mut timer = ManualDebounceTimer::new(&clock, handler);

        timer.start(Duration::from_millis(100));
        timer.start(Duration::MAX);
        clock.advance(Duration::from_secs(3600));
        assert!(fired.lock().is_empty());
        assert!(timer.is_armed());
        assert_eq!(clock.pending_timers(), 0);

        timer.start(Duration::from_millis(10));
        clock.advance(Duration::from_millis(10));
        assert_eq!(fired.lock().len(), 1);
    }

    #[test]
    fn test_thread_timer_accepts_unrepresentable_deadline() {
        let (handler, fired) = recording_handler();
        let mut timer = ThreadDebounceTimer::new(handler);

        timer.start(Duration::from_millis(5));
        timer.start(Duration::MAX);
        thread::sleep(Duration::from_millis(50));
        assert!(fired.lock().is_empty());
        assert!(timer.is_armed());
    }

    #[test]
    fn test_manual_stop_is_idempotent() {
        let clock = ManualClock::new();
        let (handler, fired) = recording_handler();
        let mut timer = ManualDebounceTimer::new(&clock, handler);

        timer.start(Duration::from_millis(10));
        timer.stop();
        timer.stop();
        clock.advance(Duration::from_secs(1));

        assert!(fired.lock().is_empty());
        assert_eq!(timer.current_generation(), Generation(1));
    }

    #[test]
    fn test_manual_drop_cancels() {
        let clock = ManualClock::new();
        let (handler, fired) = recording_handler();
        let mut timer = ManualDebounceTimer::new(&clock, handler);

        timer.start(Duration::from_millis(10));
        drop(timer);
        clock.advance(Duration::from_secs(1));

        assert_eq!(clock.pending_timers(), 0);
        assert!(fired.lock().is_empty());
    }

    #[test]
    fn test_manual_timers_fire_in_deadline_order() {
        let clock = ManualClock::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let order_a = order.clone();
        let mut a = ManualDebounceTimer::new(&clock, Arc::new(move |_| order_a.lock().push("a")));
        let order_b = order.clone();
        let mut b = ManualDebounceTimer::new(&clock, Arc::new(move |_| order_b.lock().push("b")));

        a.start(Duration::from_millis(300));
        b.start(Duration::from_millis(100));
        clock.advance(Duration::from_secs(1));

        assert_eq!(*order.lock(), vec!["b", "a"]);
    }

    #[test]
    fn test_thread_timer_fires_on_timer_thread() {
        let fired_on = Arc::new(Mutex::new(None));
        let fired_on_clone = fired_on.clone();
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);

        let mut timer = ThreadDebounceTimer::new(Arc::new(move |generation| {
            *fired_on_clone.lock() = Some(thread::current().id());
            let _ = done_tx.send(generation);
        }));

        let generation = timer.start(Duration::from_millis(20));
        let fired = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(fired, generation);
        assert_ne!(*fired_on.lock(), Some(thread::current().id()));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_thread_timer_coalesces_restarts() {
        let (handler, fired) = recording_handler();
        let mut timer = ThreadDebounceTimer::new(handler);

        let mut last = Generation::NONE;
        for _ in 0..4 {
            last = timer.start(Duration::from_millis(150));
            thread::sleep(Duration::from_millis(10));
        }
        thread::sleep(Duration::from_millis(400));

        assert_eq!(*fired.lock(), vec![last]);
    }

    #[test]
    fn test_thread_timer_stop_and_drop_prevent_fire() {
        let (handler, fired) = recording_handler();
        let mut timer = ThreadDebounceTimer::new(handler.clone());
        timer.start(Duration::from_millis(30));
        timer.stop();

        let mut dropped = ThreadDebounceTimer::new(handler);
        dropped.start(Duration::from_millis(30));
        drop(dropped);

        thread::sleep(Duration::from_millis(120));
        assert!(fired.lock().is_empty());
        drop(timer);
    }
}
