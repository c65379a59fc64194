//! Time-stamped messages queued on ports and timers.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::time::SimulationTime;

/// Process-wide monotonic counter used to break ties between events enqueued
/// at the same `SimulationTime`.
///
/// A single counter shared by every port and timer is sufficient: its only
/// job is to recover insertion order among events that a `BinaryHeap`
/// otherwise considers equal, not to provide a global event id.
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_sequence() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed)
}

/// A message paired with the simulation time at which it is due.
///
/// Events are ordered by `time` ascending; ties are broken by a sequence
/// number assigned at construction, which recovers FIFO order among
/// same-time events enqueued on a single port or timer.
#[derive(Clone, Debug)]
pub struct Event<M> {
    pub(crate) message: M,
    pub(crate) time: SimulationTime,
    sequence: u64,
}

impl<M> Event<M> {
    /// Creates a new event due at `time`, stamping it with the next sequence
    /// number.
    pub(crate) fn new(message: M, time: SimulationTime) -> Self {
        Event {
            message,
            time,
            sequence: next_sequence(),
        }
    }

    /// The time at which this event is due.
    pub fn time(&self) -> SimulationTime {
        self.time
    }

    /// The message carried by this event.
    pub fn message(&self) -> &M {
        &self.message
    }

    /// Consumes the event, returning its message.
    pub fn into_message(self) -> M {
        self.message
    }
}

impl<M> PartialEq for Event<M> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl<M> Eq for Event<M> {}

impl<M> PartialOrd for Event<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Event<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}
