//! Deferred callbacks driven by the simulation clock instead of OS timers.

use std::time::Duration;

/// Handle returned when a payload is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Scheduled<T> {
    id: TimerId,
    due: Duration,
    payload: T,
}

/// Queue of payloads that become due after a simulated delay.
///
/// Payloads are released in due-time order; payloads sharing a due time are
/// released in the order they were scheduled. Clearing the queue drops every
/// pending payload so nothing fires into a torn-down session.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time accumulated by the queue.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of payloads waiting to become due.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedules `payload` to become due once `delay` of simulated time passes.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        let index = self.pending.partition_point(|entry| entry.due <= due);
        self.pending.insert(index, Scheduled { id, due, payload });
        id
    }

    /// Cancels a pending payload, returning it when it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let index = self.pending.iter().position(|entry| entry.id == id)?;
        Some(self.pending.remove(index).payload)
    }

    /// Advances the clock and appends every payload that became due to `out`.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<T>) {
        self.now = self.now.saturating_add(dt);
        let due = self.pending.partition_point(|entry| entry.due <= self.now);
        out.extend(self.pending.drain(..due).map(|entry| entry.payload));
    }

    /// Drops every pending payload without firing it.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
