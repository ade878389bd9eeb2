//=========================================================================
// Intro Scene
//=========================================================================
//
// Scripted story text shown once before the first level.
//
// Timeline (from init):
//   1000ms  line 1
//   3500ms  line 2
//   6000ms  line 3
//   9000ms  Finish → Exit
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::context::Context;
use crate::core::scene::{ExitStatus, Scene, SceneKey};
use crate::core::sequencer::{sequence, Effect};
use crate::core::view::Node;

//=== Constants ===========================================================

const LINES: [&str; 3] = [
    "The garden has gone quiet.",
    "Only you can bring the seeds back.",
    "Let's get growing.",
];

//=== Types ===============================================================

#[derive(Debug, Clone, PartialEq)]
pub enum IntroMsg {
    Reveal(usize),
    Skip,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Intro {
    visible: usize,
    done: bool,
}

impl Intro {
    pub fn visible_lines(&self) -> usize {
        self.visible
    }

    fn exit(&mut self) -> ExitStatus<(), Effect<IntroMsg>> {
        if self.done {
            return ExitStatus::Continue(Effect::none());
        }
        self.done = true;
        ExitStatus::Exit(Effect::none(), ())
    }
}

//=== Scene ===============================================================

impl Scene for Intro {
    type Flags = ();
    type Msg = IntroMsg;
    type Exit = ();

    const KEY: SceneKey = SceneKey::Intro;

    fn init(_: (), _context: &Context) -> (Self, Effect<IntroMsg>) {
        let script = sequence([
            (Duration::from_millis(1000), IntroMsg::Reveal(0)),
            (Duration::from_millis(2500), IntroMsg::Reveal(1)),
            (Duration::from_millis(2500), IntroMsg::Reveal(2)),
            (Duration::from_millis(3000), IntroMsg::Finish),
        ]);
        (Self::default(), script)
    }

    fn update(&mut self, msg: IntroMsg, _context: &mut Context) -> ExitStatus<(), Effect<IntroMsg>> {
        match msg {
            IntroMsg::Reveal(line) => {
                self.visible = self.visible.max(line + 1).min(LINES.len());
                ExitStatus::Continue(Effect::none())
            }
            IntroMsg::Skip | IntroMsg::Finish => self.exit(),
        }
    }

    fn view(&self, _context: &Context) -> Node<IntroMsg> {
        let lines = LINES
            .iter()
            .take(self.visible)
            .enumerate()
            .map(|(i, line)| Node::element("p").key(format!("line-{i}")).child(Node::text(*line)));

        Node::element("div")
            .children(lines)
            .child(Node::button("Skip", IntroMsg::Skip).key("skip"))
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_reveals_lines_then_finishes() {
        let mut context = Context::default();
        let (mut intro, script) = Intro::init((), &context);

        let offsets: Vec<_> = script.delayed().iter().map(|d| d.delay.as_millis()).collect();
        assert_eq!(offsets, vec![1000, 3500, 6000, 9000]);

        for delayed in script.delayed() {
            let status = intro.update(delayed.msg.clone(), &mut context);
            if delayed.msg == IntroMsg::Finish {
                assert!(status.is_exit());
            }
        }
        assert_eq!(intro.visible_lines(), 3);
    }

    #[test]
    fn finish_after_skip_exits_only_once() {
        let mut context = Context::default();
        let (mut intro, _) = Intro::init((), &context);

        assert!(intro.update(IntroMsg::Skip, &mut context).is_exit());
        assert!(!intro.update(IntroMsg::Finish, &mut context).is_exit());
    }
}
