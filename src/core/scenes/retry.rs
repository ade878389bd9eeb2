//=========================================================================
// Retry Scene
//=========================================================================
//
// Shown over a lost level. A life is taken shortly after the scene
// appears; only then can the player try again or go back to the hub.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::context::{cache_current_lives, Context};
use crate::core::scene::{ExitStatus, Scene, SceneKey};
use crate::core::sequencer::{sequence, Effect};
use crate::core::view::Node;

//=== Constants ===========================================================

const LOSE_LIFE_DELAY: Duration = Duration::from_millis(1000);
const FADE_OUT_DELAY: Duration = Duration::from_millis(500);

//=== Types ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDestination {
    ToLevel,
    ToHub,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryMsg {
    LoseLife,
    TryAgain,
    GoToHub,
    Leave(RetryDestination),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Retry {
    life_lost: bool,
    leaving: bool,
}

impl Retry {
    pub fn life_lost(&self) -> bool {
        self.life_lost
    }

    fn leave(&mut self, destination: RetryDestination) -> ExitStatus<RetryDestination, Effect<RetryMsg>> {
        if !self.life_lost || self.leaving {
            return ExitStatus::Continue(Effect::none());
        }
        self.leaving = true;
        ExitStatus::Continue(sequence([(FADE_OUT_DELAY, RetryMsg::Leave(destination))]))
    }
}

//=== Scene ===============================================================

impl Scene for Retry {
    type Flags = ();
    type Msg = RetryMsg;
    type Exit = RetryDestination;

    const KEY: SceneKey = SceneKey::Retry;

    fn init(_: (), _context: &Context) -> (Self, Effect<RetryMsg>) {
        (Self::default(), sequence([(LOSE_LIFE_DELAY, RetryMsg::LoseLife)]))
    }

    fn update(
        &mut self,
        msg: RetryMsg,
        context: &mut Context,
    ) -> ExitStatus<RetryDestination, Effect<RetryMsg>> {
        match msg {
            RetryMsg::LoseLife if !self.life_lost => {
                self.life_lost = true;
                context.modify(Context::decrement_life);
                ExitStatus::Continue(cache_current_lives(context))
            }
            RetryMsg::LoseLife => ExitStatus::Continue(Effect::none()),

            RetryMsg::TryAgain if context.lives().count() > 0 => self.leave(RetryDestination::ToLevel),
            RetryMsg::TryAgain => ExitStatus::Continue(Effect::none()),

            RetryMsg::GoToHub => self.leave(RetryDestination::ToHub),

            RetryMsg::Leave(destination) => ExitStatus::Exit(Effect::none(), destination),
        }
    }

    fn view(&self, context: &Context) -> Node<RetryMsg> {
        let hearts = (0..context.lives().count())
            .map(|i| Node::element("g").key(format!("heart-{i}")).attr("class", "heart"));

        let mut node = Node::element("div")
            .attr("class", if self.leaving { "fade-out" } else { "fade-in" })
            .child(Node::element("g").key("lives").children(hearts));

        if self.life_lost && !self.leaving {
            node = node
                .child(Node::button("Try again", RetryMsg::TryAgain).key("try-again"))
                .child(Node::button("Back to map", RetryMsg::GoToHub).key("to-hub"));
        }
        node
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequencer::Command;

    #[test]
    fn loses_exactly_one_life() {
        let mut context = Context::default();
        let (mut retry, effect) = Retry::init((), &context);
        assert_eq!(effect.delayed()[0].msg, RetryMsg::LoseLife);

        let effect = retry.update(RetryMsg::LoseLife, &mut context).ignore();
        assert_eq!(context.lives().count(), 4);
        assert!(matches!(effect.commands(), [Command::CacheLives(cache)] if cache.count == 4));

        retry.update(RetryMsg::LoseLife, &mut context);
        assert_eq!(context.lives().count(), 4);
    }

    #[test]
    fn buttons_wait_for_the_life_to_go() {
        let mut context = Context::default();
        let (mut retry, _) = Retry::init((), &context);

        assert!(retry.view(&context).click_messages().is_empty());
        assert!(retry.update(RetryMsg::TryAgain, &mut context).ignore().is_none());

        retry.update(RetryMsg::LoseLife, &mut context);
        let effect = retry.update(RetryMsg::TryAgain, &mut context).ignore();
        assert_eq!(effect.delayed()[0].msg, RetryMsg::Leave(RetryDestination::ToLevel));

        let exit = retry.update(RetryMsg::Leave(RetryDestination::ToLevel), &mut context);
        assert_eq!(exit.into_parts().1, Some(RetryDestination::ToLevel));
    }

    #[test]
    fn go_to_hub() {
        let mut context = Context::default();
        let (mut retry, _) = Retry::init((), &context);
        retry.update(RetryMsg::LoseLife, &mut context);

        let effect = retry.update(RetryMsg::GoToHub, &mut context).ignore();
        assert_eq!(effect.delayed()[0].msg, RetryMsg::Leave(RetryDestination::ToHub));
        // A second choice while fading out is ignored.
        assert!(retry.update(RetryMsg::TryAgain, &mut context).ignore().is_none());
    }
}
