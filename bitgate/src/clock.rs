use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

use crate::bit::Bit;
use crate::port::PortId;

/// Logical simulation time, in milliseconds since the circuit was created.
#[derive(
    Default, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct Instant(u64);

impl Instant {
    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, d: Duration) -> Self {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(ms))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// An output write waiting for its propagation delay to elapse.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct ScheduledWrite {
    pub due: Instant,
    pub port: PortId,
    pub value: Bit,
    seq: u64,
}

// BinaryHeap is a max-heap: reverse so the earliest write pops first, ties in
// insertion order.
impl Ord for ScheduledWrite {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledWrite {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default, Debug)]
pub(crate) struct Scheduler {
    now: Instant,
    queue: BinaryHeap<ScheduledWrite>,
    next_seq: u64,
}

impl Scheduler {
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn schedule(&mut self, delay: Duration, port: PortId, value: Bit) -> Instant {
        let due = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledWrite {
            due,
            port,
            value,
            seq,
        });
        due
    }

    /// Pops the earliest write due at or before `until` and moves the clock to
    /// its due time.
    pub fn pop_due(&mut self, until: Instant) -> Option<ScheduledWrite> {
        if self.queue.peek()?.due > until {
            return None;
        }
        let write = self.queue.pop()?;
        self.now = self.now.max(write.due);
        Some(write)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.queue.peek().map(|x| x.due)
    }

    pub fn advance_to(&mut self, t: Instant) {
        self.now = self.now.max(t);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
