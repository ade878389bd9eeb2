//=========================================================================
// Level Catalog
//=========================================================================
//
// Level identifiers and the static catalog of worlds.
//
// Layout:
//   Worlds
//     └─ worlds: Vec<Vec<LevelConfig>>   (index + 1 = world / level number)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== LevelId =============================================================

/// A (world, level) pair, both 1-based.
///
/// Ordering is lexicographic: every level of world 1 comes before any
/// level of world 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LevelId {
    pub world: u32,
    pub level: u32,
}

impl LevelId {
    /// The first level of the game.
    pub const FIRST: LevelId = LevelId::new(1, 1);

    pub const fn new(world: u32, level: u32) -> Self {
        Self { world, level }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.world, self.level)
    }
}

//=== Tutorials ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TutorialKind {
    Basics,
    Seeds,
    Weather,
    Burrows,
}

/// Tutorial shown on top of a level the first time it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialConfig {
    pub kind: TutorialKind,
    pub steps: u32,
}

//=== LevelConfig =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    /// Moves available before the level is lost.
    pub moves: u32,

    /// Seeds to collect to win.
    pub target: u32,

    pub tutorial: Option<TutorialConfig>,
}

//=== Worlds ==============================================================

/// Every level of the game, grouped by world.
#[derive(Debug, Clone, PartialEq)]
pub struct Worlds {
    worlds: Vec<Vec<LevelConfig>>,
}

impl Worlds {
    pub fn new(worlds: Vec<Vec<LevelConfig>>) -> Self {
        Self { worlds }
    }

    pub fn config(&self, id: LevelId) -> Option<&LevelConfig> {
        let world = self.worlds.get(id.world.checked_sub(1)? as usize)?;
        world.get(id.level.checked_sub(1)? as usize)
    }

    pub fn contains(&self, id: LevelId) -> bool {
        self.config(id).is_some()
    }

    pub fn world_count(&self) -> u32 {
        self.worlds.len() as u32
    }

    /// The level after `id`; the last level of the game has no successor
    /// and maps to itself.
    pub fn next(&self, id: LevelId) -> LevelId {
        let in_world = id.level.checked_add(1).map(|level| LevelId::new(id.world, level));
        let next_world = id.world.checked_add(1).map(|world| LevelId::new(world, 1));

        in_world
            .into_iter()
            .chain(next_world)
            .find(|&candidate| self.contains(candidate))
            .unwrap_or(id)
    }

    pub fn is_last_in_world(&self, id: LevelId) -> bool {
        self.contains(id)
            && !id
                .level
                .checked_add(1)
                .is_some_and(|level| self.contains(LevelId::new(id.world, level)))
    }

    /// All level ids in play order.
    pub fn levels(&self) -> impl Iterator<Item = LevelId> + '_ {
        self.worlds.iter().enumerate().flat_map(|(w, levels)| {
            (0..levels.len()).map(move |l| LevelId::new(w as u32 + 1, l as u32 + 1))
        })
    }
}

impl Default for Worlds {
    /// Three worlds of growing length; each world opens with a tutorial.
    fn default() -> Self {
        let tutorial_for = |world: u32, level: u32| match (world, level) {
            (1, 1) => Some(TutorialConfig { kind: TutorialKind::Basics, steps: 3 }),
            (1, 4) => Some(TutorialConfig { kind: TutorialKind::Seeds, steps: 4 }),
            (2, 1) => Some(TutorialConfig { kind: TutorialKind::Weather, steps: 3 }),
            (3, 1) => Some(TutorialConfig { kind: TutorialKind::Burrows, steps: 4 }),
            _ => None,
        };

        let worlds = [6u32, 7, 8]
            .iter()
            .enumerate()
            .map(|(w, &count)| {
                let world = w as u32 + 1;
                (1..=count)
                    .map(|level| LevelConfig {
                        moves: 10 + level * 2,
                        target: 20 + world * 10 + level * 5,
                        tutorial: tutorial_for(world, level),
                    })
                    .collect()
            })
            .collect();

        Self::new(worlds)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ids_order_by_world_then_level() {
        assert!(LevelId::new(1, 6) < LevelId::new(2, 1));
        assert!(LevelId::new(2, 1) < LevelId::new(2, 2));
        assert_eq!(LevelId::new(3, 4).to_string(), "3-4");
    }

    #[test]
    fn config_rejects_zero_and_out_of_range() {
        let worlds = Worlds::default();
        assert!(worlds.config(LevelId::new(0, 1)).is_none());
        assert!(worlds.config(LevelId::new(1, 0)).is_none());
        assert!(worlds.config(LevelId::new(1, 7)).is_none());
        assert!(worlds.config(LevelId::new(4, 1)).is_none());
        assert!(worlds.config(LevelId::new(3, 8)).is_some());
    }

    #[test]
    fn next_walks_across_worlds_and_stops_at_the_end() {
        let worlds = Worlds::default();
        assert_eq!(worlds.next(LevelId::new(1, 1)), LevelId::new(1, 2));
        assert_eq!(worlds.next(LevelId::new(1, 6)), LevelId::new(2, 1));
        assert_eq!(worlds.next(LevelId::new(3, 8)), LevelId::new(3, 8));
    }

    #[test]
    fn last_in_world() {
        let worlds = Worlds::default();
        assert!(worlds.is_last_in_world(LevelId::new(1, 6)));
        assert!(!worlds.is_last_in_world(LevelId::new(1, 5)));
        assert!(!worlds.is_last_in_world(LevelId::new(9, 9)));
    }

    #[test]
    fn extreme_ids_do_not_overflow() {
        let worlds = Worlds::default();
        let edge = LevelId::new(u32::MAX, u32::MAX);

        assert_eq!(worlds.next(edge), edge);
        assert_eq!(worlds.next(LevelId::new(1, u32::MAX)), LevelId::new(2, 1));
        assert!(!worlds.is_last_in_world(edge));
    }

    #[test]
    fn default_catalog_has_tutorials() {
        let worlds = Worlds::default();
        let with_tutorial: Vec<_> = worlds
            .levels()
            .filter(|&id| worlds.config(id).and_then(|c| c.tutorial).is_some())
            .collect();
        assert_eq!(
            with_tutorial,
            vec![LevelId::new(1, 1), LevelId::new(1, 4), LevelId::new(2, 1), LevelId::new(3, 1)]
        );
        assert_eq!(worlds.levels().count(), 21);
    }
}
