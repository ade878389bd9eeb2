//=========================================================================
// Scene System
//=========================================================================
//
// Uniform scene contract and the orchestrator hosting every scene.
//
// Architecture:
//   Orchestrator
//     ├─ scene: SceneState            (foreground)
//     ├─ backdrop: Option<SceneState> (rendered beneath, mostly frozen)
//     └─ context: Context             (single authoritative copy)
//
// Flow:
//   Msg::Scene(..) → route() → Scene::update() → ExitStatus
//                                   ├─ Continue → effects lifted into Msg
//                                   └─ Exit     → transitions::on_exit()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::Context;
use crate::core::sequencer::Effect;
use crate::core::view::{MenuOption, Node};

//=== Module Declarations =================================================

mod exit;
mod orchestrator;
mod transitions;

//=== Public API ==========================================================

pub use exit::ExitStatus;
pub use orchestrator::{
    Flags, Msg, Orchestrator, SceneMsg, SceneState, Settings, Subscriptions, DEFAULT_FAST_POLL,
    DEFAULT_SLOW_POLL,
};
pub use transitions::{TransitionTiming, DEFAULT_LOADING_COVER, DEFAULT_LOADING_DWELL};

//=== SceneKey ============================================================

/// Identifies a scene variant.
///
/// The name doubles as the stable view key of the scene's render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Title,
    Intro,
    Hub,
    Tutorial,
    Level,
    Retry,
    Summary,
    Garden,
}

impl SceneKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Intro => "intro",
            Self::Hub => "hub",
            Self::Tutorial => "tutorial",
            Self::Level => "level",
            Self::Retry => "retry",
            Self::Summary => "summary",
            Self::Garden => "garden",
        }
    }
}

//=== Scene Trait =========================================================

/// Contract every scene implements.
///
/// The orchestrator only ever talks to a scene through these operations;
/// it never reads scene fields. The shared [`Context`] is owned by the
/// orchestrator and lent to the scene for each call.
///
/// # Minimal Implementation
///
/// ```rust
/// # use stagehand::prelude::*;
/// struct Splash;
///
/// impl Scene for Splash {
///     type Flags = ();
///     type Msg = ();
///     type Exit = ();
///     const KEY: SceneKey = SceneKey::Title;
///
///     fn init(_: (), _: &Context) -> (Self, Effect<()>) {
///         (Splash, Effect::none())
///     }
///
///     fn update(&mut self, _: (), _: &mut Context) -> ExitStatus<(), Effect<()>> {
///         ExitStatus::Exit(Effect::none(), ())
///     }
///
///     fn view(&self, _: &Context) -> Node<()> {
///         Node::text("splash")
///     }
/// }
/// ```
pub trait Scene: Sized {
    /// Arguments needed besides the context to start the scene.
    type Flags;

    /// Scene-local messages.
    type Msg;

    /// Payload reported once when the scene finishes.
    type Exit;

    const KEY: SceneKey;

    /// Starts the scene.
    fn init(flags: Self::Flags, context: &Context) -> (Self, Effect<Self::Msg>);

    /// Handles one message. Returns `Exit` exactly once, when the scene
    /// reaches a terminal state.
    fn update(
        &mut self,
        msg: Self::Msg,
        context: &mut Context,
    ) -> ExitStatus<Self::Exit, Effect<Self::Msg>>;

    fn view(&self, context: &Context) -> Node<Self::Msg>;

    /// Options shown in the menu overlay while this scene is foreground.
    ///
    /// Scenes without options run with the menu disabled.
    fn menu_options() -> Vec<MenuOption<Self::Msg>> {
        Vec::new()
    }
}
