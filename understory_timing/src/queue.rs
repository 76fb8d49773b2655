// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed, coalescing timer queue.

use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Timestamp or duration in milliseconds.
///
/// The epoch is chosen by the host; only differences matter.
pub type Millis = u64;

/// Result of scheduling a timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// No timer was pending for the key; a new one was queued.
    Scheduled,
    /// A timer was already pending for the key and absorbed this request.
    ///
    /// The pending deadline is the earlier of the two.
    Coalesced,
}

#[derive(Copy, Clone, Debug)]
struct Pending {
    deadline: Millis,
    seq: u64,
}

/// A keyed queue of deadlines with at most one pending timer per key.
///
/// See the [crate documentation](crate) for an overview.
#[derive(Clone, Debug)]
pub struct TimerQueue<K>
where
    K: Copy + Eq + Hash,
{
    pending: HashMap<K, Pending>,
    next_seq: u64,
}

impl<K> Default for TimerQueue<K>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns `true` if a timer is pending for `key`.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Returns the pending deadline for `key`, if any.
    #[must_use]
    pub fn deadline(&self, key: &K) -> Option<Millis> {
        self.pending.get(key).map(|p| p.deadline)
    }

    /// Returns the earliest pending deadline.
    ///
    /// Hosts can use this to decide how long the event loop may sleep.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Schedules `key` to fire at `deadline`.
    ///
    /// If a timer is already pending for `key`, the request coalesces into it
    /// and the earlier of the two deadlines is kept.
    pub fn schedule(&mut self, key: K, deadline: Millis) -> ScheduleOutcome {
        if let Some(existing) = self.pending.get_mut(&key) {
            if deadline < existing.deadline {
                existing.deadline = deadline;
            }
            tracing::trace!(deadline = existing.deadline, "timer coalesced");
            return ScheduleOutcome::Coalesced;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(key, Pending { deadline, seq });
        ScheduleOutcome::Scheduled
    }

    /// Schedules `key` to fire `delay` milliseconds after `now`.
    pub fn schedule_after(&mut self, key: K, now: Millis, delay: Millis) -> ScheduleOutcome {
        self.schedule(key, now.saturating_add(delay))
    }

    /// Moves the deadline for `key` to `deadline`, pending or not.
    ///
    /// Unlike [`TimerQueue::schedule`], a later deadline replaces an earlier
    /// one. This gives debounce semantics: the timer fires once the triggers
    /// have been quiet for the whole delay.
    pub fn reschedule(&mut self, key: K, deadline: Millis) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(key, Pending { deadline, seq });
    }

    /// Cancels the pending timer for `key`.
    ///
    /// Returns `true` if a timer was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Cancels all pending timers.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Removes and returns every key whose deadline is `<= now`.
    ///
    /// Keys are returned in deadline order; timers with equal deadlines are
    /// returned in the order they were first scheduled.
    pub fn take_due(&mut self, now: Millis) -> SmallVec<[K; 4]> {
        let mut due: SmallVec<[(Pending, K); 4]> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, p)| (*p, *k))
            .collect();
        due.sort_unstable_by_key(|(p, _)| (p.deadline, p.seq));
        for (_, key) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(_, k)| k).collect()
    }
}
