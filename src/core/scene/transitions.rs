//=========================================================================
// Transitions
//=========================================================================
//
// What happens when the foreground scene exits.
//
// Exit table:
//   Title    ToHub        → GoToHub(reached)
//            ToIntro      → InitIntro
//   Intro                 → loading screen → GoToHub(reached)
//   Hub      Level(id)    → InitTutorial(id) if the level has a tutorial,
//                           else loading screen → InitLevel(id)
//            Garden       → loading screen → InitGarden
//            ResetData    → ClearCache, Restart
//   Tutorial              → backdrop level becomes the scene
//   Level    Win          → Summary (first completion) | loading → Hub
//            Lose         → Retry | loading → Hub (last life)
//            Restart      → loading screen → RestartLevel
//            Exit         → loading screen → Hub
//   Retry    ToLevel      → loading screen → ClearBackdrop, RestartLevel
//            ToHub        → loading screen → ClearBackdrop, Hub
//   Summary  ToHub        → loading screen → ClearBackdrop, GoToHub(reached)
//            ToGarden     → loading screen → ClearBackdrop, InitGarden
//   Garden                → loading screen → GoToHub(reached)
//
// Loading screen recipe (offsets from the exit):
//   0               ShowLoadingScreen   (cover fades in)
//   cover           target message(s)   (scene swaps while covered)
//   cover + dwell   HideLoadingScreen
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::orchestrator::{Msg, Orchestrator};
use crate::core::context::{cache_current_lives, cache_progress, Context};
use crate::core::scenes::{
    HubDestination, LevelStatus, RetryDestination, SummaryDestination, TitleDestination,
};
use crate::core::sequencer::{sequence, trigger, Command, Effect};

//=== Constants ===========================================================

pub const DEFAULT_LOADING_COVER: Duration = Duration::from_millis(1000);
pub const DEFAULT_LOADING_DWELL: Duration = Duration::from_millis(1500);

//=== TransitionTiming ====================================================

/// Durations of the loading screen recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Time for the loading screen to fully cover the old scene.
    pub loading_cover: Duration,

    /// Time the new scene stays covered before the screen lifts.
    pub loading_dwell: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            loading_cover: DEFAULT_LOADING_COVER,
            loading_dwell: DEFAULT_LOADING_DWELL,
        }
    }
}

impl TransitionTiming {
    /// Shows the loading screen, dispatches `targets` once covered, then
    /// hides it again.
    ///
    /// All targets fire at the same instant, in order.
    pub fn with_loading_screen<I>(&self, targets: I) -> Effect<Msg>
    where
        I: IntoIterator<Item = Msg>,
    {
        let mut entries = vec![(Duration::ZERO, Msg::ShowLoadingScreen)];
        let mut delay = self.loading_cover;
        for target in targets {
            entries.push((delay, target));
            delay = Duration::ZERO;
        }
        entries.push((self.loading_dwell + delay, Msg::HideLoadingScreen));
        sequence(entries)
    }
}

//=== SceneExit ===========================================================

/// Exit payload of the foreground scene, tagged with its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SceneExit {
    Title(TitleDestination),
    Intro,
    Hub(HubDestination),
    Tutorial,
    Level(LevelStatus),
    Retry(RetryDestination),
    Summary(SummaryDestination),
    Garden,
}

//=== Exit Handlers =======================================================

/// Decides the next transition after the foreground scene exits.
pub(crate) fn on_exit(orchestrator: &mut Orchestrator, exit: SceneExit) -> Effect<Msg> {
    debug!(target: "orchestrator", "Scene exit: {:?}", exit);

    let timing = orchestrator.timing();
    let reached = orchestrator.context().progress().reached_level();

    match exit {
        SceneExit::Title(TitleDestination::ToHub) => trigger(Msg::GoToHub(reached)),
        SceneExit::Title(TitleDestination::ToIntro) => trigger(Msg::InitIntro),

        SceneExit::Intro => timing.with_loading_screen([Msg::GoToHub(reached)]),

        SceneExit::Hub(HubDestination::Level(level)) => {
            let has_tutorial = orchestrator
                .worlds()
                .config(level)
                .is_some_and(|config| config.tutorial.is_some());

            if has_tutorial {
                trigger(Msg::InitTutorial(level))
            } else {
                timing.with_loading_screen([Msg::InitLevel(level)])
            }
        }
        SceneExit::Hub(HubDestination::Garden) => timing.with_loading_screen([Msg::InitGarden]),
        SceneExit::Hub(HubDestination::ResetData) => {
            Effect::command(Command::ClearCache).and(trigger(Msg::Restart))
        }

        SceneExit::Tutorial => {
            if orchestrator.move_backdrop_to_scene() {
                Effect::none()
            } else {
                warn!(target: "orchestrator", "Tutorial exited without a level beneath it");
                trigger(Msg::RestartLevel)
            }
        }

        SceneExit::Level(status) => on_level_exit(orchestrator, status),

        SceneExit::Retry(RetryDestination::ToLevel) => {
            timing.with_loading_screen([Msg::ClearBackdrop, Msg::RestartLevel])
        }
        SceneExit::Retry(RetryDestination::ToHub) => {
            let focus = orchestrator.hub_focus();
            timing.with_loading_screen([Msg::ClearBackdrop, Msg::GoToHub(focus)])
        }

        SceneExit::Summary(SummaryDestination::ToHub) => {
            timing.with_loading_screen([Msg::ClearBackdrop, Msg::GoToHub(reached)])
        }
        SceneExit::Summary(SummaryDestination::ToGarden) => {
            timing.with_loading_screen([Msg::ClearBackdrop, Msg::InitGarden])
        }

        SceneExit::Garden => timing.with_loading_screen([Msg::GoToHub(reached)]),
    }
}

fn on_level_exit(orchestrator: &mut Orchestrator, status: LevelStatus) -> Effect<Msg> {
    let timing = orchestrator.timing();
    let focus = orchestrator.hub_focus();

    match status {
        LevelStatus::Win => {
            let first_completion = !orchestrator.context().progress().current_level_complete();
            let worlds = orchestrator.worlds().clone();
            orchestrator.update_context(|c| c.next_success_message());

            if first_completion {
                orchestrator.update_context(|c| c.increment_progress(&worlds));
                cache_progress(orchestrator.context()).and(trigger(Msg::InitSummary))
            } else {
                timing.with_loading_screen([Msg::GoToHub(focus)])
            }
        }

        LevelStatus::Lose => {
            if orchestrator.context().lives().count() <= 1 {
                orchestrator.update_context(Context::decrement_life);
                cache_current_lives(orchestrator.context())
                    .and(timing.with_loading_screen([Msg::GoToHub(focus)]))
            } else {
                trigger(Msg::InitRetry)
            }
        }

        LevelStatus::Restart => timing.with_loading_screen([Msg::RestartLevel]),
        LevelStatus::Exit => timing.with_loading_screen([Msg::GoToHub(focus)]),

        LevelStatus::NotStarted | LevelStatus::InProgress => {
            debug!(target: "orchestrator", "Ignoring level exit with status {:?}", status);
            Effect::none()
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn loading_screen_recipe_offsets() {
        let effect = TransitionTiming::default().with_loading_screen([Msg::InitGarden]);

        let offsets: Vec<_> = effect.delayed().iter().map(|d| (d.delay, d.msg.clone())).collect();
        assert_eq!(
            offsets,
            vec![
                (ms(0), Msg::ShowLoadingScreen),
                (ms(1000), Msg::InitGarden),
                (ms(2500), Msg::HideLoadingScreen),
            ]
        );
    }

    #[test]
    fn several_targets_fire_together_under_the_cover() {
        let timing = TransitionTiming {
            loading_cover: ms(200),
            loading_dwell: ms(300),
        };
        let effect = timing.with_loading_screen([Msg::ClearBackdrop, Msg::RestartLevel]);

        let offsets: Vec<_> = effect.delayed().iter().map(|d| (d.delay, d.msg.clone())).collect();
        assert_eq!(
            offsets,
            vec![
                (ms(0), Msg::ShowLoadingScreen),
                (ms(200), Msg::ClearBackdrop),
                (ms(200), Msg::RestartLevel),
                (ms(500), Msg::HideLoadingScreen),
            ]
        );
    }
}
