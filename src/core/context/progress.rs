//=========================================================================
// Progress
//=========================================================================
//
// Which level the player has reached and which one is being played.
//
// Invariant: `reached` never decreases. Only `increment` moves it, and
// only forward along the catalog. Winning the last level of the catalog
// leaves `reached` in place and sets `finished` instead.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::levels::{LevelId, Worlds};

//=== ProgressCache =======================================================

/// Persisted form of [`Progress`]: the reached level and whether it was
/// won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCache {
    pub world: u32,
    pub level: u32,
    #[serde(default)]
    pub finished: bool,
}

impl ProgressCache {
    pub fn new(world: u32, level: u32) -> Self {
        Self {
            world,
            level,
            finished: false,
        }
    }
}

//=== Progress ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    current: Option<LevelId>,
    reached: LevelId,

    /// The last level of the catalog has been won.
    finished: bool,
}

impl Progress {
    pub fn new(reached: LevelId) -> Self {
        Self {
            current: None,
            reached,
            finished: false,
        }
    }

    /// Restores progress from cache. Missing data or a level outside the
    /// catalog falls back to the first level.
    pub fn from_cache(cache: Option<&ProgressCache>, worlds: &Worlds) -> Self {
        let Some(cache) = cache else {
            return Self::default();
        };

        let reached = LevelId::new(cache.world, cache.level);
        if worlds.contains(reached) {
            Self {
                finished: cache.finished && worlds.next(reached) == reached,
                ..Self::new(reached)
            }
        } else {
            debug!(target: "cache", "Cached level {} is not in the catalog, starting over", reached);
            Self::default()
        }
    }

    pub fn to_cache(&self) -> ProgressCache {
        ProgressCache {
            world: self.reached.world,
            level: self.reached.level,
            finished: self.finished,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn current_level(&self) -> Option<LevelId> {
        self.current
    }

    pub fn reached_level(&self) -> LevelId {
        self.reached
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True when `level` has been won at least once.
    pub fn is_complete(&self, level: LevelId) -> bool {
        level < self.reached || (self.finished && level == self.reached)
    }

    /// True when the level being played was already completed before.
    pub fn current_level_complete(&self) -> bool {
        self.current.is_some_and(|current| self.is_complete(current))
    }

    //--- Updates ----------------------------------------------------------

    pub fn set_current_level(self, level: LevelId) -> Self {
        Self {
            current: Some(level),
            ..self
        }
    }

    pub fn clear_current_level(self) -> Self {
        Self {
            current: None,
            ..self
        }
    }

    /// Unlocks the next level when the frontier level was just played.
    /// The last level has no successor and marks the game finished.
    pub fn increment(self, worlds: &Worlds) -> Self {
        match self.current {
            Some(current) if current == self.reached => {
                let next = worlds.next(self.reached);
                Self {
                    reached: next.max(self.reached),
                    finished: self.finished || next == self.reached,
                    ..self
                }
            }
            _ => self,
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(LevelId::FIRST)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn increment_on_frontier_unlocks_next_level() {
        let worlds = Worlds::default();
        let progress = Progress::new(LevelId::new(1, 6))
            .set_current_level(LevelId::new(1, 6))
            .increment(&worlds);

        assert_eq!(progress.reached_level(), LevelId::new(2, 1));
        assert!(progress.current_level_complete());
    }

    #[test]
    fn increment_on_replayed_level_is_noop() {
        let worlds = Worlds::default();
        let progress = Progress::new(LevelId::new(2, 3)).set_current_level(LevelId::new(1, 2));

        assert!(progress.current_level_complete());
        assert_eq!(progress.increment(&worlds), progress);
    }

    #[test]
    fn increment_without_current_level_is_noop() {
        let worlds = Worlds::default();
        let progress = Progress::new(LevelId::new(1, 3));
        assert_eq!(progress.increment(&worlds).reached_level(), LevelId::new(1, 3));
    }

    #[test]
    fn from_cache_degrades_to_first_level() {
        let worlds = Worlds::default();

        assert_eq!(Progress::from_cache(None, &worlds), Progress::default());

        let bogus = ProgressCache::new(0, 12);
        assert_eq!(Progress::from_cache(Some(&bogus), &worlds).reached_level(), LevelId::FIRST);

        let valid = ProgressCache::new(2, 4);
        let restored = Progress::from_cache(Some(&valid), &worlds);
        assert_eq!(restored.reached_level(), LevelId::new(2, 4));
        assert_eq!(restored.current_level(), None);
        assert_eq!(restored.to_cache(), valid);
    }

    #[test]
    fn winning_the_last_level_marks_it_complete() {
        let worlds = Worlds::default();
        let last = worlds.levels().last().unwrap();

        let progress = Progress::new(last).set_current_level(last);
        assert!(!progress.current_level_complete());

        let won = progress.increment(&worlds);
        assert_eq!(won.reached_level(), last);
        assert!(won.is_finished());
        assert!(won.current_level_complete());
        assert_eq!(won.increment(&worlds), won);
    }

    #[test]
    fn finished_flag_survives_the_cache() {
        let worlds = Worlds::default();
        let last = worlds.levels().last().unwrap();
        let won = Progress::new(last).set_current_level(last).increment(&worlds);

        let restored = Progress::from_cache(Some(&won.to_cache()), &worlds);
        assert!(restored.is_finished());
        assert!(restored.is_complete(last));

        // Only the last level can be finished.
        let stray = ProgressCache { finished: true, ..ProgressCache::new(1, 2) };
        assert!(!Progress::from_cache(Some(&stray), &worlds).is_finished());
    }

    #[test]
    fn cache_without_finished_flag_still_parses() {
        let cache: ProgressCache = toml::from_str("world = 3\nlevel = 8\n").unwrap();
        assert_eq!(cache, ProgressCache::new(3, 8));
    }

    proptest! {
        #[test]
        fn reached_never_decreases(
            world in 1u32..=3,
            level in 1u32..=6,
            cw in 1u32..=3,
            cl in 1u32..=6,
        ) {
            let worlds = Worlds::default();
            let start = Progress::new(LevelId::new(world, level));
            let before = start.reached_level();

            let played = start.set_current_level(LevelId::new(cw, cl));
            prop_assert_eq!(played.reached_level(), before);

            let incremented = played.increment(&worlds);
            prop_assert!(incremented.reached_level() >= before);
            prop_assert!(incremented.clear_current_level().reached_level() >= before);
        }
    }
}
