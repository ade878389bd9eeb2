//=========================================================================
// Timeline
//=========================================================================
//
// Logical millisecond clock holding every pending delayed message.
//
// Each scheduled entry is an independent timer keyed by its absolute due
// time. Entries from overlapping sequences interleave by due time; ties
// fire in scheduling order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::trace;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::Delayed;

//=== Timestamp ===========================================================

/// Milliseconds since the Unix epoch.
///
/// Used both as the wall clock for lives regeneration and as the logical
/// clock of the timeline.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Reads the system clock. A clock set before the epoch reads as 0.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    pub fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_millis() as u64))
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

//=== Entry ===============================================================

struct Entry<M> {
    due: Timestamp,
    order: u64,
    msg: M,
}

impl<M> Entry<M> {
    fn key(&self) -> (Timestamp, u64) {
        (self.due, self.order)
    }
}

impl<M> PartialEq for Entry<M> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<M> Eq for Entry<M> {}

impl<M> PartialOrd for Entry<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Entry<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

//=== Timeline ============================================================

/// Min-heap of pending timers.
pub struct Timeline<M> {
    pending: BinaryHeap<Reverse<Entry<M>>>,
    next_order: u64,
}

impl<M> Timeline<M> {
    pub fn new() -> Self {
        Self {
            pending: BinaryHeap::new(),
            next_order: 0,
        }
    }

    /// Schedules delayed messages relative to `now`.
    pub fn schedule<I>(&mut self, now: Timestamp, delayed: I)
    where
        I: IntoIterator<Item = Delayed<M>>,
    {
        for Delayed { delay, msg } in delayed {
            let due = now.saturating_add(delay);
            trace!(target: "sequencer", "Timer #{} due at {}ms", self.next_order, due.as_millis());

            self.pending.push(Reverse(Entry {
                due,
                order: self.next_order,
                msg,
            }));
            self.next_order += 1;
        }
    }

    /// Removes and returns the earliest message due at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(Timestamp, M)> {
        if self.next_due()? > now {
            return None;
        }
        self.pending
            .pop()
            .map(|Reverse(entry)| (entry.due, entry.msg))
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Timestamp> {
        self.pending.peek().map(|Reverse(entry)| entry.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<M> Default for Timeline<M> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================
