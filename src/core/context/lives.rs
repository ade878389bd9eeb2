//=========================================================================
// Lives
//=========================================================================
//
// Limited attempts that regenerate over real time.
//
// Invariant: 0 <= count <= MAX_LIVES. `last_life_lost_at` is the start
// of the current regeneration period and is only set while lives are
// missing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::sequencer::Timestamp;

//=== Constants ===========================================================

pub const MAX_LIVES: u8 = 5;

/// One life comes back every five minutes by default.
pub const DEFAULT_REGEN_INTERVAL: Duration = Duration::from_secs(5 * 60);

//=== LivesCache ==========================================================

/// Persisted form of [`Lives`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivesCache {
    pub count: u8,
    pub last_life_lost_at: Option<Timestamp>,
}

//=== Lives ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lives {
    count: u8,
    last_life_lost_at: Option<Timestamp>,
    regen_interval: Duration,
}

impl Lives {
    pub fn full(regen_interval: Duration) -> Self {
        Self {
            count: MAX_LIVES,
            last_life_lost_at: None,
            regen_interval,
        }
    }

    /// Restores lives from cache and credits the time spent away.
    ///
    /// Missing or out-of-range records yield full lives.
    pub fn from_cache(cache: Option<&LivesCache>, now: Timestamp, regen_interval: Duration) -> Self {
        match cache {
            Some(cache) if cache.count < MAX_LIVES => Self {
                count: cache.count,
                last_life_lost_at: cache.last_life_lost_at,
                regen_interval,
            }
            .update(now),
            _ => Self::full(regen_interval),
        }
    }

    pub fn to_cache(&self) -> LivesCache {
        LivesCache {
            count: self.count,
            last_life_lost_at: self.last_life_lost_at,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn last_life_lost_at(&self) -> Option<Timestamp> {
        self.last_life_lost_at
    }

    pub fn regen_interval(&self) -> Duration {
        self.regen_interval
    }

    pub fn is_full(&self) -> bool {
        self.count >= MAX_LIVES
    }

    /// Time left until the next life, `None` when full or when the
    /// regeneration clock has not started yet.
    pub fn time_till_next_life(&self, now: Timestamp) -> Option<Duration> {
        if self.is_full() {
            return None;
        }
        let elapsed = now.saturating_since(self.last_life_lost_at?);
        Some(self.regen_interval.saturating_sub(elapsed))
    }

    //--- Updates ----------------------------------------------------------

    /// Removes one life, never going below zero.
    ///
    /// The regeneration clock keeps running if it already was; otherwise
    /// it starts at the next `update`.
    pub fn decrement(self) -> Self {
        Self {
            count: self.count.saturating_sub(1),
            ..self
        }
    }

    /// Credits one life per whole interval elapsed since the period start.
    pub fn update(self, now: Timestamp) -> Self {
        if self.is_full() || self.regen_interval.is_zero() {
            return Self::full(self.regen_interval);
        }

        let Some(since) = self.last_life_lost_at else {
            return Self {
                last_life_lost_at: Some(now),
                ..self
            };
        };

        let interval = self.regen_interval.as_millis();
        let gained = now.saturating_since(since).as_millis() / interval;
        let count = (self.count as u128 + gained).min(MAX_LIVES as u128) as u8;

        if count >= MAX_LIVES {
            Self::full(self.regen_interval)
        } else {
            let consumed = Duration::from_millis((gained * interval) as u64);
            Self {
                count,
                last_life_lost_at: Some(since.saturating_add(consumed)),
                ..self
            }
        }
    }
}

impl Default for Lives {
    fn default() -> Self {
        Self::full(DEFAULT_REGEN_INTERVAL)
    }
}

//=== Tests ===============================================================
