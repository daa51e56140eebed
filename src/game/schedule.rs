//! Delayed events keyed by the logical simulation clock
//!
//! Every entry carries the session generation it was scheduled under; a
//! reset bumps the generation so late entries from a torn-down session
//! can be recognised and dropped when they come due.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Events that fire outside the regular tick pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    SpawnPowerUp,
}

/// A due event together with the generation it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub due_at: u64,
    pub generation: u64,
    pub event: ScheduledEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    due_at: u64,
    seq: u64,
    generation: u64,
    event: ScheduledEvent,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_at
            .cmp(&other.due_at)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending events. Ties on `due_at` fire in scheduling order.
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_at: u64, generation: u64, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            due_at,
            seq,
            generation,
            event,
        }));
    }

    /// Pop every entry due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: u64) -> Vec<Scheduled> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.due_at > now {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push(Scheduled {
                    due_at: entry.due_at,
                    generation: entry.generation,
                    event: entry.event,
                });
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Earliest pending due time
    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(e)| e.due_at)
    }
}
