//=========================================================================
// Runtime
//=========================================================================
//
// Drives the orchestrator: dispatches messages, keeps the timeline of
// delayed messages, polls lives and executes outbound commands.
//
// Architecture:
//   dispatch(msg) → Orchestrator::update → Effect
//                                           ├─ delayed  → Timeline
//                                           └─ commands → execute()
//
//   advance_to(now) fires, in time order:
//     - timeline entries due at or before `now`
//     - the lives poll (interval from Orchestrator::subscriptions)
//
// Time is logical: nothing fires until the host advances the clock.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::cache::Cache;
use crate::core::context::{BackgroundColor, Window};
use crate::core::scene::{Flags, Msg, Orchestrator, Settings};
use crate::core::sequencer::{Command, Effect, Timeline, Timestamp};
use crate::core::view::{animation, Node};

//=== Runtime =============================================================

pub struct Runtime<C: Cache> {
    orchestrator: Orchestrator,
    timeline: Timeline<Msg>,
    now: Timestamp,
    next_lives_poll: Timestamp,
    cache: C,
    rng: fastrand::Rng,
    bounce_keyframes: Option<String>,
}

impl<C: Cache> Runtime<C> {
    //--- Construction -----------------------------------------------------

    /// Starts a session at `now` from whatever `cache` holds.
    pub fn new(now: Timestamp, window: Window, cache: C, settings: Settings) -> Self {
        Self::with_rng(now, window, cache, settings, fastrand::Rng::new())
    }

    /// Like [`Runtime::new`] with a caller-provided random source.
    pub fn with_rng(
        now: Timestamp,
        window: Window,
        cache: C,
        settings: Settings,
        mut rng: fastrand::Rng,
    ) -> Self {
        let blob = cache.load();
        let flags = Flags {
            now,
            cached_lives: blob.lives,
            cached_progress: blob.progress,
            random_message_index: rng.usize(..),
            window,
        };

        let (orchestrator, effect) = Orchestrator::init(flags, settings);
        let poll = orchestrator.subscriptions().lives_poll;

        let mut runtime = Self {
            orchestrator,
            timeline: Timeline::new(),
            now,
            next_lives_poll: now.saturating_add(poll),
            cache,
            rng,
            bounce_keyframes: None,
        };
        runtime.run_effect(effect);

        debug!(target: "runtime", "Runtime started at {}ms", now.as_millis());
        runtime
    }

    //--- Accessors --------------------------------------------------------

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Latest bounce stylesheet, regenerated on every resize.
    pub fn bounce_keyframes(&self) -> Option<&str> {
        self.bounce_keyframes.as_deref()
    }

    pub fn pending_timers(&self) -> usize {
        self.timeline.len()
    }

    /// Earliest instant at which `advance_to` has work to do.
    pub fn next_wakeup(&self) -> Timestamp {
        self.timeline
            .next_due()
            .map_or(self.next_lives_poll, |due| due.min(self.next_lives_poll))
    }

    pub fn view(&self) -> Node<Msg> {
        self.orchestrator.view()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Handles one message at the current time.
    pub fn dispatch(&mut self, msg: Msg) {
        trace!(target: "runtime", "Dispatch at {}ms: {:?}", self.now.as_millis(), msg);
        let effect = self.orchestrator.update(msg);
        self.run_effect(effect);
    }

    /// Moves the clock to `now`, firing everything due on the way.
    ///
    /// Each fired message sees the clock at its own due time, so
    /// sequences scheduled by earlier messages are stamped correctly.
    /// Several lives polls falling in the same idle stretch collapse into
    /// one at the end of it.
    pub fn advance_to(&mut self, now: Timestamp) {
        loop {
            let timer = self.timeline.next_due().filter(|&due| due <= now);
            let poll = Some(self.next_lives_poll).filter(|&due| due <= now);

            match (timer, poll) {
                (Some(due), poll) if poll.map_or(true, |p| due <= p) => {
                    if let Some((due, msg)) = self.timeline.pop_due(now) {
                        self.now = self.now.max(due);
                        self.dispatch(msg);
                    }
                }
                (timer, Some(poll)) => {
                    let at = if timer.is_none() { now } else { poll };
                    self.now = self.now.max(at);
                    self.dispatch(Msg::UpdateLives(self.now));

                    let interval = self.orchestrator.subscriptions().lives_poll;
                    self.next_lives_poll = self.now.saturating_add(interval);
                }
                _ => break,
            }
        }

        self.now = self.now.max(now);
    }

    //--- Effects ----------------------------------------------------------

    fn run_effect(&mut self, effect: Effect<Msg>) {
        let (delayed, commands) = effect.into_parts();
        self.timeline.schedule(self.now, delayed);
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        debug!(target: "runtime", "Command: {:?}", command);

        let result = match command {
            Command::CacheLives(lives) => self.cache.save_lives(&lives),
            Command::CacheProgress(progress) => self.cache.save_progress(&progress),
            Command::ClearCache => self.cache.clear(),

            Command::GenerateBounceKeyframes { tile_size } => {
                self.bounce_keyframes = Some(animation::bounce_keyframes(tile_size));
                Ok(())
            }

            Command::RandomBackground => {
                let color = BackgroundColor::random(&mut self.rng);
                self.dispatch(Msg::RandomBackground(color));
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!(target: "cache", "Cache write failed: {}", e);
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::{CacheBlob, MemoryCache};
    use crate::core::context::{LevelId, LivesCache, ProgressCache, MAX_LIVES};
    use crate::core::scene::{SceneKey, SceneMsg, SceneState};
    use crate::core::scenes::{HubMsg, LevelMsg, RetryMsg, SummaryMsg, TitleMsg, TutorialMsg};
    use std::time::Duration;

    //--- Helpers ----------------------------------------------------------

    const T0: u64 = 1_000_000;

    fn runtime_with(blob: CacheBlob) -> Runtime<MemoryCache> {
        Runtime::with_rng(
            Timestamp::from_millis(T0),
            Window::new(800, 600),
            MemoryCache::new(blob),
            Settings::default(),
            fastrand::Rng::with_seed(42),
        )
    }

    fn runtime() -> Runtime<MemoryCache> {
        runtime_with(CacheBlob::default())
    }

    fn advance(runtime: &mut Runtime<MemoryCache>, millis: u64) {
        let target = runtime.now().saturating_add(Duration::from_millis(millis));
        runtime.advance_to(target);
    }

    fn key(runtime: &Runtime<MemoryCache>) -> SceneKey {
        runtime.orchestrator().scene().key()
    }

    fn backdrop(runtime: &Runtime<MemoryCache>) -> Option<SceneKey> {
        runtime.orchestrator().backdrop().map(SceneState::key)
    }

    fn scene(msg: SceneMsg) -> Msg {
        Msg::Scene(msg)
    }

    /// Advances far enough for every pending transition to settle.
    fn settle(runtime: &mut Runtime<MemoryCache>) {
        advance(runtime, 20_000);
    }

    //--- Startup ----------------------------------------------------------

    #[test]
    fn startup_generates_keyframes_and_shows_title() {
        let runtime = runtime();
        assert_eq!(key(&runtime), SceneKey::Title);
        assert!(runtime
            .bounce_keyframes()
            .is_some_and(|css| css.contains("bounce-down")));
    }

    #[test]
    fn startup_credits_lives_regenerated_while_away() {
        let blob = CacheBlob {
            lives: Some(LivesCache {
                count: 1,
                last_life_lost_at: Some(Timestamp::from_millis(T0 - 11 * 60 * 1000)),
            }),
            progress: Some(ProgressCache::new(2, 3)),
        };
        let runtime = runtime_with(blob);

        assert_eq!(runtime.orchestrator().context().lives().count(), 3);
        assert_eq!(
            runtime.orchestrator().context().progress().reached_level(),
            LevelId::new(2, 3)
        );
    }

    //--- Sequencing -------------------------------------------------------

    #[test]
    fn loading_screen_covers_the_scene_swap() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::Scene(SceneMsg::Hub(HubMsg::ShowGarden)));
        assert_eq!(key(&runtime), SceneKey::Title, "hub message dropped on title");

        runtime.dispatch(Msg::GoToHub(LevelId::FIRST));
        runtime.dispatch(scene(SceneMsg::Hub(HubMsg::ShowGarden)));
        advance(&mut runtime, 0);

        // t = 0: loading screen shown, hub still in front.
        assert!(runtime.orchestrator().context().loading_screen().is_some());
        assert_eq!(key(&runtime), SceneKey::Hub);

        advance(&mut runtime, 999);
        assert_eq!(key(&runtime), SceneKey::Hub);

        // t = 1000: garden opens under the cover.
        advance(&mut runtime, 1);
        assert_eq!(key(&runtime), SceneKey::Garden);
        assert!(runtime.orchestrator().context().loading_screen().is_some());

        // t = 2500: cover lifts.
        advance(&mut runtime, 1499);
        assert!(runtime.orchestrator().context().loading_screen().is_some());
        advance(&mut runtime, 1);
        assert!(runtime.orchestrator().context().loading_screen().is_none());
    }

    #[test]
    fn title_play_reaches_intro_then_hub() {
        let mut runtime = runtime();
        runtime.dispatch(scene(SceneMsg::Title(TitleMsg::Play)));
        advance(&mut runtime, 1000);
        assert_eq!(key(&runtime), SceneKey::Intro);

        settle(&mut runtime);
        assert_eq!(key(&runtime), SceneKey::Hub);
        assert_eq!(runtime.pending_timers(), 0);
    }

    #[test]
    fn overlapping_transitions_are_not_cancelled() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::GoToHub(LevelId::FIRST));

        // A second garden request while the first is still running.
        runtime.dispatch(scene(SceneMsg::Hub(HubMsg::ShowGarden)));
        advance(&mut runtime, 500);
        runtime.dispatch(scene(SceneMsg::Hub(HubMsg::ShowGarden)));

        advance(&mut runtime, 500);
        assert_eq!(key(&runtime), SceneKey::Garden);

        // The first sequence's hide fires while the second still covers.
        advance(&mut runtime, 1500);
        assert!(runtime.orchestrator().context().loading_screen().is_none());

        settle(&mut runtime);
        assert_eq!(key(&runtime), SceneKey::Garden);
    }

    //--- Full Flows -------------------------------------------------------

    fn play_level_one_with_tutorial(runtime: &mut Runtime<MemoryCache>) {
        runtime.dispatch(Msg::GoToHub(LevelId::FIRST));
        runtime.dispatch(scene(SceneMsg::Hub(HubMsg::Select(LevelId::FIRST))));
        advance(runtime, 0);

        assert_eq!(key(runtime), SceneKey::Tutorial);
        assert_eq!(backdrop(runtime), Some(SceneKey::Level));

        runtime.dispatch(scene(SceneMsg::Tutorial(TutorialMsg::Skip)));
        advance(runtime, 1000);
        assert_eq!(key(runtime), SceneKey::Level);
        assert_eq!(backdrop(runtime), None);
    }

    #[test]
    fn tutorial_then_win_then_summary_then_hub() {
        let mut runtime = runtime();
        play_level_one_with_tutorial(&mut runtime);

        // The reveal scheduled under the tutorial still reaches the level.
        match runtime.orchestrator().scene() {
            SceneState::Level(level) => assert!(level.board_revealed()),
            other => panic!("expected level, got {other:?}"),
        }

        runtime.dispatch(scene(SceneMsg::Level(LevelMsg::Move { collected: 1_000 })));
        advance(&mut runtime, 2000);

        assert_eq!(key(&runtime), SceneKey::Summary);
        assert_eq!(backdrop(&runtime), Some(SceneKey::Level));
        assert_eq!(
            runtime.cache().load().progress,
            Some(ProgressCache::new(1, 2))
        );

        // Summary finishes on its own and the backdrop is cleared.
        settle(&mut runtime);
        assert_eq!(key(&runtime), SceneKey::Hub);
        assert_eq!(backdrop(&runtime), None);
        assert_eq!(runtime.orchestrator().context().progress().current_level(), None);
    }

    #[test]
    fn lose_then_retry_then_replay() {
        let mut runtime = runtime();
        play_level_one_with_tutorial(&mut runtime);

        let moves = runtime
            .orchestrator()
            .worlds()
            .config(LevelId::FIRST)
            .map_or(0, |c| c.moves);
        for _ in 0..moves {
            runtime.dispatch(scene(SceneMsg::Level(LevelMsg::Move { collected: 0 })));
        }
        advance(&mut runtime, 2000);

        assert_eq!(key(&runtime), SceneKey::Retry);
        assert_eq!(backdrop(&runtime), Some(SceneKey::Level));
        assert_eq!(runtime.orchestrator().context().lives().count(), MAX_LIVES);

        // Retry takes the life after its delay and caches it.
        advance(&mut runtime, 1000);
        assert_eq!(runtime.orchestrator().context().lives().count(), MAX_LIVES - 1);
        assert_eq!(runtime.cache().load().lives.map(|l| l.count), Some(MAX_LIVES - 1));

        runtime.dispatch(scene(SceneMsg::Retry(RetryMsg::TryAgain)));
        settle(&mut runtime);

        assert_eq!(key(&runtime), SceneKey::Level);
        assert_eq!(backdrop(&runtime), None);
        assert!(runtime.orchestrator().context().loading_screen().is_none());
    }

    #[test]
    fn summary_of_last_level_in_world_opens_the_garden() {
        let blob = CacheBlob {
            lives: None,
            progress: Some(ProgressCache::new(1, 6)),
        };
        let mut runtime = runtime_with(blob);
        runtime.dispatch(Msg::InitLevel(LevelId::new(1, 6)));
        advance(&mut runtime, 600);

        runtime.dispatch(scene(SceneMsg::Level(LevelMsg::Move { collected: 1_000 })));
        advance(&mut runtime, 2000);
        assert_eq!(key(&runtime), SceneKey::Summary);

        runtime.dispatch(scene(SceneMsg::Summary(SummaryMsg::Finish)));
        settle(&mut runtime);
        assert_eq!(key(&runtime), SceneKey::Garden);
        assert_eq!(backdrop(&runtime), None);
    }

    //--- Lives & Cache ----------------------------------------------------

    #[test]
    fn lives_regenerate_through_polling() {
        let blob = CacheBlob {
            lives: Some(LivesCache {
                count: 3,
                last_life_lost_at: Some(Timestamp::from_millis(T0)),
            }),
            progress: None,
        };
        let mut runtime = runtime_with(blob);

        advance(&mut runtime, 4 * 60 * 1000);
        assert_eq!(runtime.orchestrator().context().lives().count(), 3);

        advance(&mut runtime, 60 * 1000 + 5000);
        assert_eq!(runtime.orchestrator().context().lives().count(), 4);
        assert_eq!(runtime.cache().load().lives.map(|l| l.count), Some(4));
    }

    #[test]
    fn poll_interval_follows_the_foreground_scene() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::GoToHub(LevelId::FIRST));

        // The poll scheduled at startup still uses the slow interval.
        assert_eq!(runtime.next_wakeup(), Timestamp::from_millis(T0 + 5000));
        advance(&mut runtime, 5000);
        assert_eq!(runtime.next_wakeup(), Timestamp::from_millis(T0 + 6000));
    }

    #[test]
    fn reset_data_clears_the_cache() {
        let blob = CacheBlob {
            lives: Some(LivesCache { count: 2, last_life_lost_at: Some(Timestamp::from_millis(T0)) }),
            progress: Some(ProgressCache::new(2, 1)),
        };
        let mut runtime = runtime_with(blob);
        runtime.dispatch(Msg::GoToHub(LevelId::new(2, 1)));
        runtime.dispatch(scene(SceneMsg::Hub(HubMsg::ResetData)));
        assert_eq!(runtime.cache().load(), CacheBlob::default());

        advance(&mut runtime, 0);
        assert_eq!(key(&runtime), SceneKey::Title);
        assert_eq!(
            runtime.orchestrator().context().progress().reached_level(),
            LevelId::FIRST
        );
    }

    #[test]
    fn resize_regenerates_keyframes() {
        let mut runtime = runtime();
        let before = runtime.bounce_keyframes().map(str::to_owned);

        runtime.dispatch(Msg::WindowSize { width: 320, height: 480 });
        assert_ne!(runtime.bounce_keyframes().map(str::to_owned), before);
    }
}
