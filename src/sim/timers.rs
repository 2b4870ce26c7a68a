//! Deferred actions keyed to the host clock
//!
//! Timers run on wall-clock time supplied by the host, not on the simulation
//! clock, so they keep expiring while the run is paused. They are drained on
//! the simulation thread at the start of each frame.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::equipment::WeaponId;

/// An action to apply once its timer expires
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// Refill the magazine of this specific weapon instance
    ReloadComplete { weapon: WeaponId },
}

#[derive(Debug, Clone)]
struct Entry {
    due: f64,
    /// Insertion order breaks ties between equal due times
    seq: u64,
    action: Deferred,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of pending deferred actions
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl TimerQueue {
    /// Schedule `action` to fire at host time `due` (seconds)
    pub fn schedule(&mut self, due: f64, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due, seq, action }));
    }

    /// Remove every pending action matching `pred`; returns how many
    pub fn cancel(&mut self, mut pred: impl FnMut(&Deferred) -> bool) -> usize {
        let before = self.heap.len();
        self.heap.retain(|Reverse(entry)| !pred(&entry.action));
        before - self.heap.len()
    }

    /// Pop the earliest action due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Option<Deferred> {
        let ready = self.heap.peek().is_some_and(|Reverse(entry)| entry.due <= now);
        if ready {
            self.heap.pop().map(|Reverse(entry)| entry.action)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reload(id: u32) -> Deferred {
        Deferred::ReloadComplete { weapon: WeaponId(id) }
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut q = TimerQueue::default();
        q.schedule(2.0, reload(2));
        q.schedule(1.0, reload(1));
        q.schedule(1.0, reload(3));

        assert_eq!(q.pop_due(0.5), None);
        assert_eq!(q.pop_due(1.5), Some(reload(1)));
        assert_eq!(q.pop_due(1.5), Some(reload(3)));
        assert_eq!(q.pop_due(1.5), None);
        assert_eq!(q.pop_due(2.0), Some(reload(2)));
        assert!(q.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut q = TimerQueue::default();
        q.schedule(1.0, reload(1));
        q.schedule(1.0, reload(2));
        let removed = q.cancel(|a| *a == reload(1));
        assert_eq!(removed, 1);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(5.0), Some(reload(2)));
    }
}
