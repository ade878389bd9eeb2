//=========================================================================
// Garden Scene
//=========================================================================
//
// One flower per completed world.
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

const BLOOM_DELAY: Duration = Duration::from_millis(800);
const FADE_OUT_DELAY: Duration = Duration::from_millis(500);

//=== Types ===============================================================

#[derive(Debug, Clone, PartialEq)]
pub enum GardenMsg {
    Bloom,
    Back,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Garden {
    bloomed: bool,
    leaving: bool,
}

impl Garden {
    pub fn bloomed(&self) -> bool {
        self.bloomed
    }
}

//=== Scene ===============================================================

impl Scene for Garden {
    type Flags = ();
    type Msg = GardenMsg;
    type Exit = ();

    const KEY: SceneKey = SceneKey::Garden;

    fn init(_: (), _context: &Context) -> (Self, Effect<GardenMsg>) {
        (Self::default(), sequence([(BLOOM_DELAY, GardenMsg::Bloom)]))
    }

    fn update(&mut self, msg: GardenMsg, _context: &mut Context) -> ExitStatus<(), Effect<GardenMsg>> {
        match msg {
            GardenMsg::Bloom => {
                self.bloomed = true;
                ExitStatus::Continue(Effect::none())
            }
            GardenMsg::Back if !self.leaving => {
                self.leaving = true;
                ExitStatus::Continue(sequence([(FADE_OUT_DELAY, GardenMsg::Leave)]))
            }
            GardenMsg::Back => ExitStatus::Continue(Effect::none()),
            GardenMsg::Leave => ExitStatus::Exit(Effect::none(), ()),
        }
    }

    fn view(&self, context: &Context) -> Node<GardenMsg> {
        let completed_worlds = context.progress().reached_level().world.saturating_sub(1);
        let flowers = (0..completed_worlds).map(|world| {
            Node::element("g")
                .key(format!("flower-{}", world + 1))
                .attr("bloomed", self.bloomed.to_string())
        });

        Node::element("div")
            .child(Node::element("svg").key("flowers").children(flowers))
            .child(Node::button("Back", GardenMsg::Back).key("back"))
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::{LevelId, Worlds};

    #[test]
    fn back_exits_after_fade() {
        let mut context = Context::default();
        let (mut garden, _) = Garden::init((), &context);

        let effect = garden.update(GardenMsg::Back, &mut context).ignore();
        assert_eq!(effect.delayed()[0].msg, GardenMsg::Leave);
        assert!(garden.update(GardenMsg::Back, &mut context).ignore().is_none());
        assert!(garden.update(GardenMsg::Leave, &mut context).is_exit());
    }

    #[test]
    fn one_flower_per_completed_world() {
        let worlds = Worlds::default();
        let mut context = Context::default();
        while context.progress().reached_level() < LevelId::new(2, 1) {
            let reached = context.progress().reached_level();
            context.modify(|c| c.set_current_level(reached).increment_progress(&worlds));
        }

        let (mut garden, _) = Garden::init((), &context);
        garden.update(GardenMsg::Bloom, &mut context);

        let view = garden.view(&context);
        assert_eq!(view.find_key("flower-1").and_then(|n| n.get_attr("bloomed")), Some("true"));
        assert!(view.find_key("flower-2").is_none());
    }
}
