//! Cancellable one-shot timers on a caller-driven millisecond clock.
//!
//! Nothing here sleeps or spawns. Components schedule actions against the
//! queue and the host moves time forward; due actions come back out of
//! [`TimerQueue::pop_due`] in deadline order, ties in scheduling order.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Opaque handle to a scheduled action. Unique for the lifetime of its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<A> {
    pub handle: TimerHandle,
    pub deadline_ms: u64,
    pub action: A,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    next_id: u64,
    pending: BTreeMap<(u64, TimerHandle), A>,
    deadlines: HashMap<TimerHandle, u64>,
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedule `action` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, action: A) -> TimerHandle {
        self.schedule_at(now_ms.saturating_add(delay_ms), action)
    }

    /// Like [`schedule`](Self::schedule), but refuses a deadline past the
    /// end of the clock instead of pinning it to `u64::MAX`.
    pub fn try_schedule(&mut self, now_ms: u64, delay_ms: u64, action: A) -> Option<TimerHandle> {
        let deadline_ms = now_ms.checked_add(delay_ms)?;
        Some(self.schedule_at(deadline_ms, action))
    }

    /// Schedule `action` at an absolute deadline.
    pub fn schedule_at(&mut self, deadline_ms: u64, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline_ms, handle), action);
        self.deadlines.insert(handle, deadline_ms);
        handle
    }

    /// Cancel a pending timer. Returns `false` if it already fired, was
    /// already cancelled, or never belonged to this queue.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => self.pending.remove(&(deadline, handle)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    pub fn deadline_of(&self, handle: TimerHandle) -> Option<u64> {
        self.deadlines.get(&handle).copied()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.first_key_value().map(|((deadline, _), _)| *deadline)
    }

    /// Remove and return the earliest timer whose deadline is `<= now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired<A>> {
        let (&(deadline_ms, handle), _) = self.pending.first_key_value()?;
        if deadline_ms > now_ms {
            return None;
        }
        let action = self.pending.remove(&(deadline_ms, handle))?;
        self.deadlines.remove(&handle);
        Some(Fired {
            handle,
            deadline_ms,
            action,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending timer. Handles stay unique afterwards.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds since the Unix epoch, for hosts that run in real time.
pub fn wall_clock_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(0, 300, "c");
        q.schedule(0, 100, "a");
        q.schedule(0, 200, "b");

        assert!(q.pop_due(50).is_none());
        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(1_000))
            .map(|f| f.action)
            .collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule_at(500, 1);
        q.schedule_at(500, 2);
        q.schedule_at(500, 3);
        assert_eq!(q.pop_due(500).map(|f| f.action), Some(1));
        assert_eq!(q.pop_due(500).map(|f| f.action), Some(2));
        assert_eq!(q.pop_due(500).map(|f| f.action), Some(3));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let keep = q.schedule(0, 100, "keep");
        let drop = q.schedule(0, 50, "drop");

        assert!(q.cancel(drop));
        assert!(!q.is_pending(drop));
        assert!(q.is_pending(keep));
        assert_eq!(q.next_deadline(), Some(100));

        let fired = q.pop_due(200).unwrap();
        assert_eq!(fired.handle, keep);
        assert_eq!(fired.deadline_ms, 100);
        assert!(q.pop_due(200).is_none());
    }

    #[test]
    fn try_schedule_refuses_overflow() {
        let mut q = TimerQueue::new();
        assert!(q.try_schedule(u64::MAX - 5, 10, ()).is_none());
        assert!(q.is_empty());

        let h = q.try_schedule(u64::MAX - 10, 10, ()).unwrap();
        assert_eq!(q.deadline_of(h), Some(u64::MAX));
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let mut q = TimerQueue::new();
        let h = q.schedule(0, 10, ());
        assert!(q.pop_due(10).is_some());
        assert!(!q.cancel(h));
        assert!(!q.cancel(h));
    }

    #[test]
    fn handles_stay_unique_after_clear() {
        let mut q = TimerQueue::new();
        let first = q.schedule(0, 10, ());
        q.clear();
        let second = q.schedule(0, 10, ());
        assert_ne!(first, second);
        assert!(!q.cancel(first));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn schedule_saturates_on_overflow() {
        let mut q = TimerQueue::new();
        let h = q.schedule(u64::MAX - 1, 10, ());
        assert_eq!(q.deadline_of(h), Some(u64::MAX));
    }
}
