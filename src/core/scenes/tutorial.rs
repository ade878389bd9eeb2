//=========================================================================
// Tutorial Scene
//=========================================================================
//
// Step-by-step walkthrough drawn over its level, which sits in the
// backdrop and keeps running underneath.
//
// Lifecycle:
//   init → Next* → (last step | Skip) → (fade delay) → Finish → Exit
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::context::{Context, TutorialConfig, TutorialKind};
use crate::core::scene::{ExitStatus, Scene, SceneKey};
use crate::core::sequencer::{sequence, Effect};
use crate::core::view::Node;

//=== Constants ===========================================================

const FADE_OUT_DELAY: Duration = Duration::from_millis(500);

//=== Types ===============================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TutorialMsg {
    Next,
    Skip,
    Finish,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tutorial {
    config: TutorialConfig,
    step: u32,
    leaving: bool,
}

impl Tutorial {
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn is_leaving(&self) -> bool {
        self.leaving
    }

    fn leave(&mut self) -> Effect<TutorialMsg> {
        self.leaving = true;
        sequence([(FADE_OUT_DELAY, TutorialMsg::Finish)])
    }

    fn instruction(&self) -> &'static str {
        match (self.config.kind, self.step) {
            (TutorialKind::Basics, 0) => "Connect tiles of the same kind",
            (TutorialKind::Basics, 1) => "Longer chains collect more",
            (TutorialKind::Basics, _) => "Reach the target before your moves run out",
            (TutorialKind::Seeds, 0) => "Seeds grow where tiles are cleared",
            (TutorialKind::Seeds, _) => "Connect seeds to plant them",
            (TutorialKind::Weather, 0) => "Sun and rain change the board",
            (TutorialKind::Weather, _) => "Use the weather to ripen seeds",
            (TutorialKind::Burrows, 0) => "Something is hiding in the burrows",
            (TutorialKind::Burrows, _) => "Clear tiles next to a burrow to uncover it",
        }
    }
}

//=== Scene ===============================================================

impl Scene for Tutorial {
    type Flags = TutorialConfig;
    type Msg = TutorialMsg;
    type Exit = ();

    const KEY: SceneKey = SceneKey::Tutorial;

    fn init(config: TutorialConfig, _context: &Context) -> (Self, Effect<TutorialMsg>) {
        let tutorial = Self {
            config,
            step: 0,
            leaving: false,
        };
        (tutorial, Effect::none())
    }

    fn update(&mut self, msg: TutorialMsg, _context: &mut Context) -> ExitStatus<(), Effect<TutorialMsg>> {
        match msg {
            TutorialMsg::Next | TutorialMsg::Skip if self.leaving => ExitStatus::Continue(Effect::none()),

            TutorialMsg::Next => {
                self.step += 1;
                if self.step >= self.config.steps {
                    ExitStatus::Continue(self.leave())
                } else {
                    ExitStatus::Continue(Effect::none())
                }
            }

            TutorialMsg::Skip => ExitStatus::Continue(self.leave()),

            TutorialMsg::Finish => ExitStatus::Exit(Effect::none(), ()),
        }
    }

    fn view(&self, _context: &Context) -> Node<TutorialMsg> {
        let counter = format!("{} / {}", (self.step + 1).min(self.config.steps), self.config.steps);

        Node::element("div")
            .attr("class", if self.leaving { "fade-out" } else { "fade-in" })
            .child(Node::element("p").key("instruction").child(Node::text(self.instruction())))
            .child(Node::element("span").key("counter").child(Node::text(counter)))
            .child(Node::button("Next", TutorialMsg::Next).key("next"))
            .child(Node::button("Skip", TutorialMsg::Skip).key("skip"))
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tutorial(steps: u32) -> Tutorial {
        let config = TutorialConfig { kind: TutorialKind::Basics, steps };
        Tutorial::init(config, &Context::default()).0
    }

    #[test]
    fn last_step_schedules_finish() {
        let mut context = Context::default();
        let mut tutorial = tutorial(2);

        assert!(tutorial.update(TutorialMsg::Next, &mut context).ignore().is_none());
        let effect = tutorial.update(TutorialMsg::Next, &mut context).ignore();
        assert_eq!(effect.delayed()[0].msg, TutorialMsg::Finish);
        assert!(tutorial.is_leaving());

        let done = tutorial.update(TutorialMsg::Finish, &mut context);
        assert!(done.is_exit());
    }

    #[test]
    fn skip_leaves_once() {
        let mut context = Context::default();
        let mut tutorial = tutorial(4);

        assert!(!tutorial.update(TutorialMsg::Skip, &mut context).ignore().is_none());
        assert!(tutorial.update(TutorialMsg::Skip, &mut context).ignore().is_none());
        assert!(tutorial.update(TutorialMsg::Next, &mut context).ignore().is_none());
        assert_eq!(tutorial.step(), 0);
    }

    #[test]
    fn view_counts_steps() {
        let mut context = Context::default();
        let mut tutorial = tutorial(3);
        tutorial.update(TutorialMsg::Next, &mut context);

        let view = tutorial.view(&context);
        assert_eq!(view.find_key("counter").map(|n| n.texts()), Some(vec!["2 / 3"]));
    }
}
