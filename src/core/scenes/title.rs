//=========================================================================
// Title Scene
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::context::{Context, LevelId};
use crate::core::scene::{ExitStatus, Scene, SceneKey};
use crate::core::sequencer::{sequence, Effect};
use crate::core::view::Node;

//=== Constants ===========================================================

const FADE_OUT_DELAY: Duration = Duration::from_millis(1000);

//=== Types ===============================================================

/// Where the title hands over to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleDestination {
    ToHub,
    /// First-time players watch the intro.
    ToIntro,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TitleMsg {
    Play,
    Leave(TitleDestination),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Title {
    fading: bool,
}

//=== Scene ===============================================================

impl Scene for Title {
    type Flags = ();
    type Msg = TitleMsg;
    type Exit = TitleDestination;

    const KEY: SceneKey = SceneKey::Title;

    fn init(_: (), _context: &Context) -> (Self, Effect<TitleMsg>) {
        (Self::default(), Effect::none())
    }

    fn update(
        &mut self,
        msg: TitleMsg,
        context: &mut Context,
    ) -> ExitStatus<TitleDestination, Effect<TitleMsg>> {
        match msg {
            TitleMsg::Play if !self.fading => {
                self.fading = true;
                let destination = if context.progress().reached_level() == LevelId::FIRST {
                    TitleDestination::ToIntro
                } else {
                    TitleDestination::ToHub
                };
                ExitStatus::Continue(sequence([(FADE_OUT_DELAY, TitleMsg::Leave(destination))]))
            }
            TitleMsg::Play => ExitStatus::Continue(Effect::none()),
            TitleMsg::Leave(destination) => ExitStatus::Exit(Effect::none(), destination),
        }
    }

    fn view(&self, _context: &Context) -> Node<TitleMsg> {
        let play = if self.fading {
            Node::element("button").child(Node::text("PLAY"))
        } else {
            Node::button("PLAY", TitleMsg::Play)
        };

        Node::element("div")
            .attr("class", if self.fading { "fade-out" } else { "fade-in" })
            .child(Node::element("h1").child(Node::text("Seeds")))
            .child(play.key("play"))
    }
}

//=== Tests ===============================================================
