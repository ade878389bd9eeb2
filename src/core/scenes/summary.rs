//=========================================================================
// Summary Scene
//=========================================================================
//
// Celebrates a newly completed level, then hands over to the hub, or to
// the garden when the level closed out its world.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::context::{Context, LevelId};
use crate::core::scene::{ExitStatus, Scene, SceneKey};
use crate::core::sequencer::{sequence, Effect};
use crate::core::view::Node;

//=== Constants ===========================================================

const REVEAL_DELAY: Duration = Duration::from_millis(1500);
const FINISH_DELAY: Duration = Duration::from_millis(2500);

//=== Types ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryDestination {
    ToHub,
    ToGarden,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryMsg {
    RevealProgress,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryFlags {
    pub completed: LevelId,
    pub world_complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    flags: SummaryFlags,
    revealed: bool,
}

impl Summary {
    pub fn revealed(&self) -> bool {
        self.revealed
    }
}

//=== Scene ===============================================================

impl Scene for Summary {
    type Flags = SummaryFlags;
    type Msg = SummaryMsg;
    type Exit = SummaryDestination;

    const KEY: SceneKey = SceneKey::Summary;

    fn init(flags: SummaryFlags, _context: &Context) -> (Self, Effect<SummaryMsg>) {
        let summary = Self { flags, revealed: false };
        let effect = sequence([
            (REVEAL_DELAY, SummaryMsg::RevealProgress),
            (FINISH_DELAY, SummaryMsg::Finish),
        ]);
        (summary, effect)
    }

    fn update(
        &mut self,
        msg: SummaryMsg,
        _context: &mut Context,
    ) -> ExitStatus<SummaryDestination, Effect<SummaryMsg>> {
        match msg {
            SummaryMsg::RevealProgress => {
                self.revealed = true;
                ExitStatus::Continue(Effect::none())
            }
            SummaryMsg::Finish => {
                let destination = if self.flags.world_complete {
                    SummaryDestination::ToGarden
                } else {
                    SummaryDestination::ToHub
                };
                ExitStatus::Exit(Effect::none(), destination)
            }
        }
    }

    fn view(&self, context: &Context) -> Node<SummaryMsg> {
        let mut node = Node::element("div")
            .child(Node::element("h2").child(Node::text(format!("Level {} complete", self.flags.completed))));

        if self.revealed {
            let next = format!("Next up: {}", context.progress().reached_level());
            node = node.child(Node::element("p").key("next-level").child(Node::text(next)));
        }
        node
    }
}

//=== Tests ===============================================================
