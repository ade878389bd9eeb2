//=========================================================================
// Orchestrator
//=========================================================================
//
// Top-level state machine hosting the scenes.
//
// State:
//   scene     foreground scene, receives its own messages
//   backdrop  optional scene rendered beneath the foreground
//   context   the one shared Context, lent to scenes per call
//
// Message routing:
//   Msg::Scene(m) where m matches the foreground  → foreground.update
//   Msg::Scene(m) where m matches a live backdrop → backdrop.update
//                                                   (exit ignored)
//   anything else                                 → dropped
//
// A backdrop is live only while a Tutorial sits over its Level, so the
// board keeps animating underneath. Every other backdrop is frozen.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::transitions::{self, SceneExit, TransitionTiming};
use super::{ExitStatus, Scene, SceneKey};
use crate::core::context::{
    cache_current_lives, BackgroundColor, Context, LevelId, Lives, LivesCache, MenuState,
    Progress, ProgressCache, Window, Worlds, DEFAULT_REGEN_INTERVAL,
};
use crate::core::scenes::{
    Garden, GardenMsg, Hub, HubFlags, HubMsg, Intro, IntroMsg, Level, LevelMsg, Retry, RetryMsg,
    Summary, SummaryFlags, SummaryMsg, Title, TitleMsg, Tutorial, TutorialMsg,
};
use crate::core::sequencer::{Command, Effect, Timestamp};
use crate::core::view::{self, MenuOption, Node};

//=== Constants ===========================================================

pub const DEFAULT_FAST_POLL: Duration = Duration::from_secs(1);
pub const DEFAULT_SLOW_POLL: Duration = Duration::from_secs(5);

//=== Messages ============================================================

/// Scene-local message tagged with the scene it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneMsg {
    Title(TitleMsg),
    Intro(IntroMsg),
    Hub(HubMsg),
    Tutorial(TutorialMsg),
    Level(LevelMsg),
    Retry(RetryMsg),
    Summary(SummaryMsg),
    Garden(GardenMsg),
}

impl SceneMsg {
    pub fn key(&self) -> SceneKey {
        match self {
            Self::Title(_) => SceneKey::Title,
            Self::Intro(_) => SceneKey::Intro,
            Self::Hub(_) => SceneKey::Hub,
            Self::Tutorial(_) => SceneKey::Tutorial,
            Self::Level(_) => SceneKey::Level,
            Self::Retry(_) => SceneKey::Retry,
            Self::Summary(_) => SceneKey::Summary,
            Self::Garden(_) => SceneKey::Garden,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Scene(SceneMsg),

    //--- Scene changes ----------------------------------------------------
    InitIntro,
    GoToHub(LevelId),
    InitTutorial(LevelId),
    InitLevel(LevelId),
    RestartLevel,
    InitRetry,
    InitSummary,
    InitGarden,
    ClearBackdrop,

    /// Drops the session and starts over from the title with nothing
    /// cached.
    Restart,

    //--- Loading screen ---------------------------------------------------
    ShowLoadingScreen,
    RandomBackground(BackgroundColor),
    HideLoadingScreen,

    //--- Environment ------------------------------------------------------
    WindowSize { width: u32, height: u32 },
    UpdateLives(Timestamp),
    OpenMenu,
    CloseMenu,
}

//=== SceneState ==========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SceneState {
    Title(Title),
    Intro(Intro),
    Hub(Hub),
    Tutorial(Tutorial),
    Level(Level),
    Retry(Retry),
    Summary(Summary),
    Garden(Garden),
}

impl SceneState {
    pub fn key(&self) -> SceneKey {
        match self {
            Self::Title(_) => SceneKey::Title,
            Self::Intro(_) => SceneKey::Intro,
            Self::Hub(_) => SceneKey::Hub,
            Self::Tutorial(_) => SceneKey::Tutorial,
            Self::Level(_) => SceneKey::Level,
            Self::Retry(_) => SceneKey::Retry,
            Self::Summary(_) => SceneKey::Summary,
            Self::Garden(_) => SceneKey::Garden,
        }
    }

    /// Scene view lifted into [`Msg`].
    pub fn view(&self, context: &Context) -> Node<Msg> {
        fn lift<S: Scene>(scene: &S, context: &Context, tag: fn(S::Msg) -> SceneMsg) -> Node<Msg> {
            scene.view(context).map(&|msg| Msg::Scene(tag(msg)))
        }

        match self {
            Self::Title(s) => lift(s, context, SceneMsg::Title),
            Self::Intro(s) => lift(s, context, SceneMsg::Intro),
            Self::Hub(s) => lift(s, context, SceneMsg::Hub),
            Self::Tutorial(s) => lift(s, context, SceneMsg::Tutorial),
            Self::Level(s) => lift(s, context, SceneMsg::Level),
            Self::Retry(s) => lift(s, context, SceneMsg::Retry),
            Self::Summary(s) => lift(s, context, SceneMsg::Summary),
            Self::Garden(s) => lift(s, context, SceneMsg::Garden),
        }
    }

    /// Menu options of the scene lifted into [`Msg`].
    pub fn menu_options(&self) -> Vec<MenuOption<Msg>> {
        fn lift<S: Scene>(tag: fn(S::Msg) -> SceneMsg) -> Vec<MenuOption<Msg>> {
            S::menu_options()
                .into_iter()
                .map(|option| option.map(|msg| Msg::Scene(tag(msg))))
                .collect()
        }

        match self {
            Self::Title(_) => lift::<Title>(SceneMsg::Title),
            Self::Intro(_) => lift::<Intro>(SceneMsg::Intro),
            Self::Hub(_) => lift::<Hub>(SceneMsg::Hub),
            Self::Tutorial(_) => lift::<Tutorial>(SceneMsg::Tutorial),
            Self::Level(_) => lift::<Level>(SceneMsg::Level),
            Self::Retry(_) => lift::<Retry>(SceneMsg::Retry),
            Self::Summary(_) => lift::<Summary>(SceneMsg::Summary),
            Self::Garden(_) => lift::<Garden>(SceneMsg::Garden),
        }
    }

    pub fn has_menu(&self) -> bool {
        !self.menu_options().is_empty()
    }

    /// Fill color behind the scene.
    pub fn background(&self) -> &'static str {
        match self {
            Self::Title(_) | Self::Intro(_) => BackgroundColor::Gold.hex(),
            Self::Hub(_) => BackgroundColor::Rainforest.hex(),
            Self::Tutorial(_) | Self::Level(_) => BackgroundColor::SeaGreen.hex(),
            Self::Retry(_) => BackgroundColor::Orange.hex(),
            Self::Summary(_) => BackgroundColor::Lavender.hex(),
            Self::Garden(_) => BackgroundColor::Blush.hex(),
        }
    }
}

//=== Scene Stepping ======================================================

fn start<S: Scene>(
    flags: S::Flags,
    context: &Context,
    wrap: fn(S) -> SceneState,
    tag: fn(S::Msg) -> SceneMsg,
) -> (SceneState, Effect<Msg>) {
    let (scene, effect) = S::init(flags, context);
    (wrap(scene), effect.map(move |msg| Msg::Scene(tag(msg))))
}

fn step<S: Scene>(
    scene: &mut S,
    msg: S::Msg,
    context: &mut Context,
    tag: fn(S::Msg) -> SceneMsg,
    exit: fn(S::Exit) -> SceneExit,
) -> ExitStatus<SceneExit, Effect<Msg>> {
    scene
        .update(msg, context)
        .map(|effect| effect.map(move |msg| Msg::Scene(tag(msg))))
        .map_exit(exit)
}

/// Updates `scene` with `msg`; `None` when they belong to different scenes.
fn update_scene(
    scene: &mut SceneState,
    msg: SceneMsg,
    context: &mut Context,
) -> Option<ExitStatus<SceneExit, Effect<Msg>>> {
    let status = match (scene, msg) {
        (SceneState::Title(s), SceneMsg::Title(m)) => step(s, m, context, SceneMsg::Title, SceneExit::Title),
        (SceneState::Intro(s), SceneMsg::Intro(m)) => step(s, m, context, SceneMsg::Intro, |()| SceneExit::Intro),
        (SceneState::Hub(s), SceneMsg::Hub(m)) => step(s, m, context, SceneMsg::Hub, SceneExit::Hub),
        (SceneState::Tutorial(s), SceneMsg::Tutorial(m)) => {
            step(s, m, context, SceneMsg::Tutorial, |()| SceneExit::Tutorial)
        }
        (SceneState::Level(s), SceneMsg::Level(m)) => step(s, m, context, SceneMsg::Level, SceneExit::Level),
        (SceneState::Retry(s), SceneMsg::Retry(m)) => step(s, m, context, SceneMsg::Retry, SceneExit::Retry),
        (SceneState::Summary(s), SceneMsg::Summary(m)) => {
            step(s, m, context, SceneMsg::Summary, SceneExit::Summary)
        }
        (SceneState::Garden(s), SceneMsg::Garden(m)) => step(s, m, context, SceneMsg::Garden, |()| SceneExit::Garden),
        _ => return None,
    };
    Some(status)
}

//=== Flags ===============================================================

/// Startup data: the clock, what the cache held and the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Flags {
    pub now: Timestamp,
    pub cached_lives: Option<LivesCache>,
    pub cached_progress: Option<ProgressCache>,
    pub random_message_index: usize,
    pub window: Window,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            now: Timestamp::from_millis(0),
            cached_lives: None,
            cached_progress: None,
            random_message_index: 0,
            window: Window::new(800, 600),
        }
    }
}

//=== Settings ============================================================

/// Static rules of a game session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub worlds: Worlds,
    pub timing: TransitionTiming,
    pub regen_interval: Duration,

    /// Lives poll interval while the hub is in front.
    pub fast_poll: Duration,

    /// Lives poll interval everywhere else.
    pub slow_poll: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worlds: Worlds::default(),
            timing: TransitionTiming::default(),
            regen_interval: DEFAULT_REGEN_INTERVAL,
            fast_poll: DEFAULT_FAST_POLL,
            slow_poll: DEFAULT_SLOW_POLL,
        }
    }
}

//=== Subscriptions =======================================================

/// Recurring inputs the host should deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscriptions {
    /// Dispatch `Msg::UpdateLives(now)` this often.
    pub lives_poll: Duration,
}

//=== Orchestrator ========================================================

#[derive(Debug, Clone)]
pub struct Orchestrator {
    scene: SceneState,
    backdrop: Option<SceneState>,
    context: Context,
    settings: Settings,

    /// The foreground has no menu but the previous one left it showing.
    menu_fading: bool,
}

impl Orchestrator {
    /// Builds the context from cached data and opens the title.
    pub fn init(flags: Flags, settings: Settings) -> (Self, Effect<Msg>) {
        let progress = Progress::from_cache(flags.cached_progress.as_ref(), &settings.worlds);
        let lives = Lives::from_cache(flags.cached_lives.as_ref(), flags.now, settings.regen_interval);
        let context = Context::new(flags.window, progress, lives, flags.random_message_index);

        let (scene, effect) = start::<Title>((), &context, SceneState::Title, SceneMsg::Title);
        let keyframes = Command::GenerateBounceKeyframes {
            tile_size: context.window().tile_size(),
        };

        let mut orchestrator = Self {
            scene,
            backdrop: None,
            context,
            settings,
            menu_fading: false,
        };
        orchestrator.reset_menu();

        (orchestrator, effect.with_command(keyframes))
    }

    //--- Accessors --------------------------------------------------------

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn backdrop(&self) -> Option<&SceneState> {
        self.backdrop.as_ref()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Replaces the context with `f(context)`.
    pub fn update_context<F>(&mut self, f: F)
    where
        F: FnOnce(Context) -> Context,
    {
        self.context.modify(f);
    }

    pub fn worlds(&self) -> &Worlds {
        &self.settings.worlds
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn timing(&self) -> TransitionTiming {
        self.settings.timing
    }

    /// Level the hub should focus when returning from play.
    pub(crate) fn hub_focus(&self) -> LevelId {
        let progress = self.context.progress();
        progress.current_level().unwrap_or_else(|| progress.reached_level())
    }

    pub fn menu_fading(&self) -> bool {
        self.menu_fading
    }

    pub fn subscriptions(&self) -> Subscriptions {
        let lives_poll = match self.scene {
            SceneState::Hub(_) => self.settings.fast_poll,
            _ => self.settings.slow_poll,
        };
        Subscriptions { lives_poll }
    }

    pub fn view(&self) -> Node<Msg> {
        view::compose(self)
    }

    //--- Update -----------------------------------------------------------

    pub fn update(&mut self, msg: Msg) -> Effect<Msg> {
        match msg {
            Msg::Scene(msg) => self.route(msg),

            Msg::InitIntro => {
                let (intro, effect) = start::<Intro>((), &self.context, SceneState::Intro, SceneMsg::Intro);
                self.enter(intro);
                effect
            }

            Msg::GoToHub(focus) => {
                self.context.modify(Context::clear_current_level);
                let flags = HubFlags {
                    focus,
                    levels: self.settings.worlds.levels().collect(),
                };
                let (hub, effect) = start::<Hub>(flags, &self.context, SceneState::Hub, SceneMsg::Hub);
                self.enter(hub);
                effect
            }

            Msg::InitTutorial(level) => self.init_tutorial(level),
            Msg::InitLevel(level) => self.init_level(level),

            Msg::RestartLevel => match self.context.progress().current_level() {
                Some(level) => self.init_level(level),
                None => {
                    warn!(target: "orchestrator", "Restart requested with no current level");
                    Effect::none()
                }
            },

            Msg::InitRetry => {
                let (retry, effect) = start::<Retry>((), &self.context, SceneState::Retry, SceneMsg::Retry);
                self.cover_with(retry);
                effect
            }

            Msg::InitSummary => {
                let completed = self.hub_focus();
                let flags = SummaryFlags {
                    completed,
                    world_complete: self.settings.worlds.is_last_in_world(completed),
                };
                let (summary, effect) =
                    start::<Summary>(flags, &self.context, SceneState::Summary, SceneMsg::Summary);
                self.cover_with(summary);
                effect
            }

            Msg::InitGarden => {
                self.context.modify(Context::clear_current_level);
                let (garden, effect) = start::<Garden>((), &self.context, SceneState::Garden, SceneMsg::Garden);
                self.enter(garden);
                effect
            }

            Msg::ClearBackdrop => {
                if let Some(backdrop) = self.backdrop.take() {
                    debug!(target: "orchestrator", "Cleared {} backdrop", backdrop.key().name());
                }
                Effect::none()
            }

            Msg::Restart => {
                debug!(target: "orchestrator", "Starting a fresh session");
                let flags = Flags {
                    window: self.context.window(),
                    random_message_index: self.context.success_message_index(),
                    ..Flags::default()
                };
                let (mut fresh, effect) = Self::init(flags, self.settings.clone());
                fresh.menu_fading = self.context.menu() != MenuState::Disabled;
                *self = fresh;
                effect
            }

            Msg::ShowLoadingScreen => Effect::command(Command::RandomBackground),

            Msg::RandomBackground(color) => {
                self.context.modify(|c| c.show_loading_screen(color));
                Effect::none()
            }

            Msg::HideLoadingScreen => {
                self.context.modify(Context::hide_loading_screen);
                Effect::none()
            }

            Msg::WindowSize { width, height } => {
                self.context.modify(|c| c.set_window(width, height));
                Effect::command(Command::GenerateBounceKeyframes {
                    tile_size: self.context.window().tile_size(),
                })
            }

            Msg::UpdateLives(now) => {
                self.context.modify(|c| c.update_lives(now));
                cache_current_lives(&self.context)
            }

            Msg::OpenMenu => {
                if self.scene.has_menu() && self.context.menu() != MenuState::Disabled {
                    self.context.modify(Context::open_menu);
                }
                Effect::none()
            }

            Msg::CloseMenu => {
                if self.context.menu() == MenuState::Open {
                    self.context.modify(Context::close_menu);
                }
                Effect::none()
            }
        }
    }

    //--- Routing ----------------------------------------------------------

    fn route(&mut self, msg: SceneMsg) -> Effect<Msg> {
        let key = msg.key();

        if self.scene.key() == key {
            return match update_scene(&mut self.scene, msg, &mut self.context) {
                Some(status) => status.on_exit(|effect, exit| effect.and(transitions::on_exit(self, exit))),
                None => Effect::none(),
            };
        }

        let live = self.backdrop_is_live();
        match self.backdrop.as_mut() {
            Some(backdrop) if live && backdrop.key() == key => {
                match update_scene(backdrop, msg, &mut self.context) {
                    Some(status) => {
                        if status.is_exit() {
                            debug!(target: "orchestrator", "Ignoring exit of {} backdrop", key.name());
                        }
                        status.ignore()
                    }
                    None => Effect::none(),
                }
            }
            _ => {
                debug!(
                    target: "orchestrator",
                    "Dropping {} message while {} is in front",
                    key.name(),
                    self.scene.key().name()
                );
                Effect::none()
            }
        }
    }

    fn backdrop_is_live(&self) -> bool {
        matches!(
            (&self.scene, &self.backdrop),
            (SceneState::Tutorial(_), Some(SceneState::Level(_)))
        )
    }

    //--- Scene Changes ----------------------------------------------------

    /// Makes `scene` the foreground and resets the menu for it.
    fn enter(&mut self, scene: SceneState) {
        debug!(
            target: "orchestrator",
            "Scene {} → {}",
            self.scene.key().name(),
            scene.key().name()
        );

        self.scene = scene;
        self.reset_menu();
    }

    /// Puts `scene` in front and keeps the previous one as backdrop.
    fn cover_with(&mut self, scene: SceneState) {
        let previous = std::mem::replace(&mut self.scene, scene);
        self.reset_menu();
        self.set_backdrop(previous);
    }

    /// Scenes with menu options start with the menu closed, others
    /// disable it.
    fn reset_menu(&mut self) {
        let has_menu = self.scene.has_menu();
        self.menu_fading = !has_menu && self.context.menu() != MenuState::Disabled;
        self.context
            .modify(|c| if has_menu { c.close_menu() } else { c.disable_menu() });
    }

    fn set_backdrop(&mut self, scene: SceneState) {
        if let Some(old) = &self.backdrop {
            warn!(target: "orchestrator", "Replacing {} backdrop", old.key().name());
        }
        debug!(target: "orchestrator", "Backdrop: {}", scene.key().name());
        self.backdrop = Some(scene);
    }

    /// Brings the backdrop to the front. Returns `false` without a backdrop.
    pub(crate) fn move_backdrop_to_scene(&mut self) -> bool {
        match self.backdrop.take() {
            Some(backdrop) => {
                self.enter(backdrop);
                true
            }
            None => false,
        }
    }

    fn init_level(&mut self, level: LevelId) -> Effect<Msg> {
        let Some(config) = self.settings.worlds.config(level).copied() else {
            warn!(target: "orchestrator", "Unknown level {level}");
            return Effect::none();
        };

        self.context.modify(|c| c.set_current_level(level));
        let (scene, effect) = start::<Level>((level, config), &self.context, SceneState::Level, SceneMsg::Level);
        self.enter(scene);
        effect
    }

    fn init_tutorial(&mut self, level: LevelId) -> Effect<Msg> {
        let Some(config) = self.settings.worlds.config(level).copied() else {
            warn!(target: "orchestrator", "Unknown level {level}");
            return Effect::none();
        };
        let Some(tutorial) = config.tutorial else {
            debug!(target: "orchestrator", "Level {level} has no tutorial");
            return self.init_level(level);
        };

        self.context.modify(|c| c.set_current_level(level));
        let (level_scene, level_effect) =
            start::<Level>((level, config), &self.context, SceneState::Level, SceneMsg::Level);
        let (tutorial_scene, tutorial_effect) =
            start::<Tutorial>(tutorial, &self.context, SceneState::Tutorial, SceneMsg::Tutorial);

        self.set_backdrop(level_scene);
        self.enter(tutorial_scene);
        tutorial_effect.and(level_effect)
    }
}

//=== Tests ===============================================================
