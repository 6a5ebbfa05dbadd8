//! Deadline-ordered queue of deferred work.
//!
//! Entries are ordered by `(deadline, sequence)`, so actions sharing a
//! deadline come out in the order they were scheduled. Cancellation is lazy:
//! the payload is dropped immediately and the heap entry is skipped when it
//! surfaces.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::equipment::EquipRequest;
use crate::state::{Slot, Timestamp};

/// Identifies one scheduled entry for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleHandle(u64);

/// Work a character engine knows how to run later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduledAction {
    Equip(EquipRequest),
    Unequip { slot: Slot, count: u32 },
    /// Re-evaluates every unlocked passive regardless of its deadline.
    ForcePassiveRefresh,
}

#[derive(Debug)]
pub struct DeadlineScheduler<A> {
    queue: BinaryHeap<Reverse<(Timestamp, u64)>>,
    pending: HashMap<u64, A>,
    next_seq: u64,
}

impl<A> Default for DeadlineScheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> DeadlineScheduler<A> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, deadline: Timestamp, action: A) -> ScheduleHandle {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.push(Reverse((deadline, seq)));
        self.pending.insert(seq, action);
        ScheduleHandle(seq)
    }

    /// Drops a pending action; returns it if it had not run yet.
    pub fn cancel(&mut self, handle: ScheduleHandle) -> Option<A> {
        self.pending.remove(&handle.0)
    }

    pub fn is_pending(&self, handle: ScheduleHandle) -> bool {
        self.pending.contains_key(&handle.0)
    }

    /// Next live deadline, if any.
    pub fn next_deadline(&mut self) -> Option<Timestamp> {
        self.discard_cancelled();
        self.queue.peek().map(|Reverse((deadline, _))| *deadline)
    }

    /// Removes and returns the earliest action whose deadline is at or
    /// before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(ScheduleHandle, A)> {
        self.discard_cancelled();
        let Reverse((deadline, seq)) = *self.queue.peek()?;
        if deadline > now {
            return None;
        }
        self.queue.pop();
        self.pending
            .remove(&seq)
            .map(|action| (ScheduleHandle(seq), action))
    }

    /// Drains every action due at `now`, in deadline order.
    pub fn drain_due(&mut self, now: Timestamp) -> Vec<A> {
        std::iter::from_fn(|| self.pop_due(now))
            .map(|(_, action)| action)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, seq))) = self.queue.peek()
            && !self.pending.contains_key(seq)
        {
            self.queue.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_then_schedule_order() {
        let mut scheduler = DeadlineScheduler::new();
        scheduler.schedule(Timestamp(300), "late");
        scheduler.schedule(Timestamp(100), "first");
        scheduler.schedule(Timestamp(100), "second");

        assert_eq!(scheduler.drain_due(Timestamp(200)), vec!["first", "second"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_deadline(), Some(Timestamp(300)));
        assert!(scheduler.pop_due(Timestamp(299)).is_none());
        assert_eq!(scheduler.pop_due(Timestamp(300)).map(|(_, a)| a), Some("late"));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancelled_entries_never_run() {
        let mut scheduler = DeadlineScheduler::new();
        let dropped = scheduler.schedule(Timestamp(10), ScheduledAction::ForcePassiveRefresh);
        let kept = scheduler.schedule(
            Timestamp(20),
            ScheduledAction::Unequip {
                slot: Slot::Head,
                count: 1,
            },
        );

        assert_eq!(
            scheduler.cancel(dropped),
            Some(ScheduledAction::ForcePassiveRefresh)
        );
        assert_eq!(scheduler.cancel(dropped), None);
        assert!(!scheduler.is_pending(dropped));
        assert_eq!(scheduler.next_deadline(), Some(Timestamp(20)));

        let (handle, _) = scheduler.pop_due(Timestamp(50)).unwrap();
        assert_eq!(handle, kept);
        assert!(scheduler.pop_due(Timestamp(50)).is_none());
    }
}
