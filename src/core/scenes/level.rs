//=========================================================================
// Level Scene
//=========================================================================
//
// A single puzzle level. The board mechanics are opaque here: the scene
// only tracks moves, collected seeds and the outcome.
//
// Lifecycle:
//   init → (reveal delay) → RevealBoard → Move* → Win | Lose
//        → (end delay) → LevelEnd → Exit(status)
//
//   Menu: Restart / Exit level exit immediately with that status.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::context::{Context, LevelConfig, LevelId};
use crate::core::scene::{ExitStatus, Scene, SceneKey};
use crate::core::sequencer::{sequence, Effect};
use crate::core::view::{MenuOption, Node};

//=== Constants ===========================================================

const BOARD_REVEAL_DELAY: Duration = Duration::from_millis(600);
const LEVEL_END_DELAY: Duration = Duration::from_millis(2000);

const SUCCESS_MESSAGES: [&str; 5] = ["Amazing!", "Awesome!", "Success!", "Brilliant!", "Nice!"];

//=== Types ===============================================================

/// Outcome of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Win,
    Lose,
    Restart,
    Exit,
    NotStarted,
    InProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LevelMsg {
    RevealBoard,
    Move { collected: u32 },
    LevelEnd,
    RestartFromMenu,
    ExitFromMenu,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    id: LevelId,
    config: LevelConfig,
    moves_left: u32,
    collected: u32,
    status: LevelStatus,
    board_revealed: bool,
}

impl Level {
    pub fn id(&self) -> LevelId {
        self.id
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn board_revealed(&self) -> bool {
        self.board_revealed
    }

    fn finish(&mut self, status: LevelStatus, context: &mut Context) -> Effect<LevelMsg> {
        self.status = status;
        context.modify(Context::disable_menu);
        sequence([(LEVEL_END_DELAY, LevelMsg::LevelEnd)])
    }
}

//=== Scene ===============================================================

impl Scene for Level {
    type Flags = (LevelId, LevelConfig);
    type Msg = LevelMsg;
    type Exit = LevelStatus;

    const KEY: SceneKey = SceneKey::Level;

    fn init((id, config): Self::Flags, _context: &Context) -> (Self, Effect<LevelMsg>) {
        let level = Self {
            id,
            config,
            moves_left: config.moves,
            collected: 0,
            status: LevelStatus::NotStarted,
            board_revealed: false,
        };
        (level, sequence([(BOARD_REVEAL_DELAY, LevelMsg::RevealBoard)]))
    }

    fn update(
        &mut self,
        msg: LevelMsg,
        context: &mut Context,
    ) -> ExitStatus<LevelStatus, Effect<LevelMsg>> {
        match msg {
            LevelMsg::RevealBoard => {
                self.board_revealed = true;
                if self.status == LevelStatus::NotStarted {
                    self.status = LevelStatus::InProgress;
                }
                ExitStatus::Continue(Effect::none())
            }

            LevelMsg::Move { collected } if self.status == LevelStatus::InProgress => {
                self.moves_left = self.moves_left.saturating_sub(1);
                self.collected += collected;

                let effect = if self.collected >= self.config.target {
                    self.finish(LevelStatus::Win, context)
                } else if self.moves_left == 0 {
                    self.finish(LevelStatus::Lose, context)
                } else {
                    Effect::none()
                };
                ExitStatus::Continue(effect)
            }

            LevelMsg::LevelEnd => match self.status {
                LevelStatus::Win | LevelStatus::Lose => ExitStatus::Exit(Effect::none(), self.status),
                _ => ExitStatus::Continue(Effect::none()),
            },

            LevelMsg::RestartFromMenu if self.is_playable() => {
                self.status = LevelStatus::Restart;
                ExitStatus::Exit(Effect::none(), LevelStatus::Restart)
            }

            LevelMsg::ExitFromMenu if self.is_playable() => {
                self.status = LevelStatus::Exit;
                ExitStatus::Exit(Effect::none(), LevelStatus::Exit)
            }

            _ => ExitStatus::Continue(Effect::none()),
        }
    }

    fn view(&self, context: &Context) -> Node<LevelMsg> {
        let header = Node::element("div")
            .key("level-info")
            .child(Node::text(format!("Level {}", self.id)))
            .child(Node::text(format!("Moves {}", self.moves_left)))
            .child(Node::text(format!("Seeds {}/{}", self.collected, self.config.target)));

        let board = Node::element("svg")
            .key("board")
            .attr("revealed", self.board_revealed.to_string())
            .attr("tile-size", format!("{:.1}", context.window().tile_size()));

        let banner = match self.status {
            LevelStatus::Win => {
                let index = context.success_message_index() % SUCCESS_MESSAGES.len();
                Node::element("p").key("banner").child(Node::text(SUCCESS_MESSAGES[index]))
            }
            LevelStatus::Lose => Node::element("p").key("banner").child(Node::text("No more moves!")),
            _ => Node::Empty,
        };

        Node::element("div").children([header, board, banner])
    }

    fn menu_options() -> Vec<MenuOption<LevelMsg>> {
        vec![
            MenuOption::new("Restart", LevelMsg::RestartFromMenu),
            MenuOption::new("Exit level", LevelMsg::ExitFromMenu),
        ]
    }
}

impl Level {
    fn is_playable(&self) -> bool {
        matches!(self.status, LevelStatus::NotStarted | LevelStatus::InProgress)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::MenuState;

    fn config(moves: u32, target: u32) -> LevelConfig {
        LevelConfig { moves, target, tutorial: None }
    }

    fn started(moves: u32, target: u32, context: &mut Context) -> Level {
        let (mut level, effect) = Level::init((LevelId::FIRST, config(moves, target)), context);
        assert_eq!(effect.delayed()[0].msg, LevelMsg::RevealBoard);
        level.update(LevelMsg::RevealBoard, context);
        level
    }

    #[test]
    fn moves_before_reveal_are_ignored() {
        let mut context = Context::default();
        let (mut level, _) = Level::init((LevelId::FIRST, config(3, 10)), &context);

        level.update(LevelMsg::Move { collected: 50 }, &mut context);
        assert_eq!(level.status(), LevelStatus::NotStarted);
        assert_eq!(level.moves_left(), 3);
    }

    #[test]
    fn reaching_target_wins_after_end_delay() {
        let mut context = Context::default().close_menu();
        let mut level = started(5, 10, &mut context);

        let status = level.update(LevelMsg::Move { collected: 10 }, &mut context);
        assert!(!status.is_exit());
        assert_eq!(level.status(), LevelStatus::Win);
        assert_eq!(context.menu(), MenuState::Disabled);

        let effect = status.ignore();
        assert_eq!(effect.delayed()[0].delay, LEVEL_END_DELAY);

        let end = level.update(LevelMsg::LevelEnd, &mut context);
        assert_eq!(end.into_parts().1, Some(LevelStatus::Win));
    }

    #[test]
    fn running_out_of_moves_loses() {
        let mut context = Context::default();
        let mut level = started(2, 100, &mut context);

        level.update(LevelMsg::Move { collected: 1 }, &mut context);
        level.update(LevelMsg::Move { collected: 1 }, &mut context);
        assert_eq!(level.status(), LevelStatus::Lose);

        // Further moves do nothing once the level is decided.
        level.update(LevelMsg::Move { collected: 500 }, &mut context);
        assert_eq!(level.status(), LevelStatus::Lose);

        let end = level.update(LevelMsg::LevelEnd, &mut context);
        assert_eq!(end.into_parts().1, Some(LevelStatus::Lose));
    }

    #[test]
    fn stray_level_end_does_not_exit() {
        let mut context = Context::default();
        let mut level = started(5, 10, &mut context);
        assert!(!level.update(LevelMsg::LevelEnd, &mut context).is_exit());
    }

    #[test]
    fn menu_options_exit_with_their_status() {
        let mut context = Context::default();

        let mut level = started(5, 10, &mut context);
        let restart = level.update(LevelMsg::RestartFromMenu, &mut context);
        assert_eq!(restart.into_parts().1, Some(LevelStatus::Restart));

        let mut level = started(5, 10, &mut context);
        let exit = level.update(LevelMsg::ExitFromMenu, &mut context);
        assert_eq!(exit.into_parts().1, Some(LevelStatus::Exit));
    }

    #[test]
    fn win_banner_uses_success_message_index() {
        let mut context = Context::default().next_success_message();
        let mut level = started(5, 1, &mut context);
        level.update(LevelMsg::Move { collected: 1 }, &mut context);

        let view = level.view(&context);
        let banner = view.find_key("banner").map(|n| n.texts());
        assert_eq!(banner, Some(vec!["Awesome!"]));
    }
}
