//=========================================================================
// Hub Scene
//=========================================================================
//
// Level map. Reachable levels can be entered while the player has at
// least one life left.
//
// Menu:
//   Garden      → Exit(Garden)
//   Reset data  → Exit(ResetData), the session starts over
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::context::{Context, LevelId};
use crate::core::scene::{ExitStatus, Scene, SceneKey};
use crate::core::sequencer::Effect;
use crate::core::view::{MenuOption, Node};

//=== Types ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubDestination {
    Level(LevelId),
    Garden,
    ResetData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HubMsg {
    Select(LevelId),
    ShowGarden,
    ResetData,
}

/// Flags for [`Hub`]: the level to scroll to and every level on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct HubFlags {
    pub focus: LevelId,
    pub levels: Vec<LevelId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hub {
    focus: LevelId,
    levels: Vec<LevelId>,
}

impl Hub {
    pub fn focus(&self) -> LevelId {
        self.focus
    }
}

//=== Scene ===============================================================

impl Scene for Hub {
    type Flags = HubFlags;
    type Msg = HubMsg;
    type Exit = HubDestination;

    const KEY: SceneKey = SceneKey::Hub;

    fn init(flags: HubFlags, _context: &Context) -> (Self, Effect<HubMsg>) {
        let hub = Self {
            focus: flags.focus,
            levels: flags.levels,
        };
        (hub, Effect::none())
    }

    fn update(
        &mut self,
        msg: HubMsg,
        context: &mut Context,
    ) -> ExitStatus<HubDestination, Effect<HubMsg>> {
        match msg {
            HubMsg::Select(level) => {
                if level > context.progress().reached_level() {
                    debug!(target: "orchestrator", "Level {level} is locked");
                    return ExitStatus::Continue(Effect::none());
                }
                if context.lives().count() == 0 {
                    debug!(target: "orchestrator", "No lives left to enter level {level}");
                    return ExitStatus::Continue(Effect::none());
                }
                self.focus = level;
                ExitStatus::Exit(Effect::none(), HubDestination::Level(level))
            }

            HubMsg::ShowGarden => ExitStatus::Exit(Effect::none(), HubDestination::Garden),

            HubMsg::ResetData => ExitStatus::Exit(Effect::none(), HubDestination::ResetData),
        }
    }

    fn view(&self, context: &Context) -> Node<HubMsg> {
        let progress = context.progress();
        let reached = progress.reached_level();
        let can_play = context.lives().count() > 0;

        let levels = self.levels.iter().map(|&level| {
            let state = if progress.is_complete(level) {
                "complete"
            } else if level == reached {
                "reached"
            } else {
                "locked"
            };

            let node = if level <= reached && can_play {
                Node::button(level.to_string(), HubMsg::Select(level))
            } else {
                Node::element("button").child(Node::text(level.to_string()))
            };

            node.key(format!("level-{level}"))
                .attr("state", state)
                .attr("focused", (level == self.focus).to_string())
        });

        Node::element("div")
            .child(Node::element("span").key("lives").child(Node::text(context.lives().count().to_string())))
            .child(Node::element("div").key("levels").children(levels))
    }

    fn menu_options() -> Vec<MenuOption<HubMsg>> {
        vec![
            MenuOption::new("Garden", HubMsg::ShowGarden),
            MenuOption::new("Reset data", HubMsg::ResetData),
        ]
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Worlds;

    fn hub(context: &Context) -> Hub {
        let worlds = Worlds::default();
        let flags = HubFlags {
            focus: context.progress().reached_level(),
            levels: worlds.levels().collect(),
        };
        Hub::init(flags, context).0
    }

    fn player_at_level_two() -> Context {
        Context::default()
            .set_current_level(LevelId::FIRST)
            .increment_progress(&Worlds::default())
            .clear_current_level()
    }

    #[test]
    fn reachable_levels_exit() {
        let mut context = player_at_level_two();
        let mut hub = hub(&context);

        let status = hub.update(HubMsg::Select(LevelId::new(1, 2)), &mut context);
        assert_eq!(status.into_parts().1, Some(HubDestination::Level(LevelId::new(1, 2))));
    }

    #[test]
    fn locked_levels_are_ignored() {
        let mut context = player_at_level_two();
        let mut hub = hub(&context);

        let status = hub.update(HubMsg::Select(LevelId::new(1, 3)), &mut context);
        assert!(!status.is_exit());
    }

    #[test]
    fn no_lives_no_play() {
        let mut context = Context::default();
        for _ in 0..5 {
            context.modify(Context::decrement_life);
        }
        let mut hub = hub(&context);

        assert!(!hub.update(HubMsg::Select(LevelId::FIRST), &mut context).is_exit());
        assert!(hub.view(&context).click_messages().is_empty());
    }

    #[test]
    fn reset_data_exits_without_touching_progress() {
        let mut context = player_at_level_two();
        let before = context.clone();
        let mut hub = hub(&context);

        let status = hub.update(HubMsg::ResetData, &mut context);
        assert_eq!(status.into_parts().1, Some(HubDestination::ResetData));
        assert_eq!(context, before);
    }

    #[test]
    fn view_marks_level_states() {
        let context = player_at_level_two();
        let view = hub(&context).view(&context);

        let state = |id: &str| view.find_key(id).and_then(|n| n.get_attr("state"));
        assert_eq!(state("level-1-1"), Some("complete"));
        assert_eq!(state("level-1-2"), Some("reached"));
        assert_eq!(state("level-1-3"), Some("locked"));
    }
}
