//=========================================================================
// Context
//=========================================================================
//
// Cross-scene state shared by every scene.
//
// Contains:
// - window: viewport size (drives tile scaling)
// - loading_screen: color of the covering loading screen, if shown
// - progress / lives: player state, persisted through the cache
// - success_message_index: rotates the level-complete message
// - menu: options menu state of the foreground scene
//
// The orchestrator owns the only Context. Scenes receive it by reference
// for each operation. Every mutation below consumes a Context and returns
// the updated one.
//
//=========================================================================

//=== Module Declarations =================================================

mod levels;
mod lives;
mod progress;

//=== Public API ==========================================================

pub use levels::{LevelConfig, LevelId, TutorialConfig, TutorialKind, Worlds};
pub use lives::{Lives, LivesCache, DEFAULT_REGEN_INTERVAL, MAX_LIVES};
pub use progress::{Progress, ProgressCache};

//=== Internal Dependencies ===============================================

use crate::core::sequencer::{Command, Effect, Timestamp};

//=== Window ==============================================================

/// Base tile edge in pixels before window scaling.
pub const BASE_TILE_SIZE: f64 = 55.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub width: u32,
    pub height: u32,
}

impl Window {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale applied to tiles: small screens shrink, large ones grow.
    pub fn scale_factor(&self) -> f64 {
        match self.width {
            0..=479 => 0.8,
            480..=719 => 0.98,
            _ => 1.2,
        }
    }

    pub fn tile_size(&self) -> f64 {
        BASE_TILE_SIZE * self.scale_factor()
    }
}

//=== MenuState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Open,
    Closed,
    Disabled,
}

//=== BackgroundColor =====================================================

/// Palette used for the loading screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundColor {
    Gold,
    Rainforest,
    SeaGreen,
    Orange,
    Lavender,
    Blush,
}

impl BackgroundColor {
    pub const ALL: [BackgroundColor; 6] = [
        BackgroundColor::Gold,
        BackgroundColor::Rainforest,
        BackgroundColor::SeaGreen,
        BackgroundColor::Orange,
        BackgroundColor::Lavender,
        BackgroundColor::Blush,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            Self::Gold => "#FFB94E",
            Self::Rainforest => "#0CB19B",
            Self::SeaGreen => "#3AC2A7",
            Self::Orange => "#F56F3C",
            Self::Lavender => "#B48EE0",
            Self::Blush => "#F1A2A0",
        }
    }

    /// Picks a color uniformly.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }
}

//=== Context =============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    window: Window,
    loading_screen: Option<BackgroundColor>,
    progress: Progress,
    lives: Lives,
    success_message_index: usize,
    menu: MenuState,
}

impl Context {
    pub fn new(window: Window, progress: Progress, lives: Lives, success_message_index: usize) -> Self {
        Self {
            window,
            loading_screen: None,
            progress,
            lives,
            success_message_index,
            menu: MenuState::Disabled,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn loading_screen(&self) -> Option<BackgroundColor> {
        self.loading_screen
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn lives(&self) -> &Lives {
        &self.lives
    }

    pub fn success_message_index(&self) -> usize {
        self.success_message_index
    }

    pub fn menu(&self) -> MenuState {
        self.menu
    }

    /// Applies a consuming update in place.
    ///
    /// Lets code holding `&mut Context` use the by-value operations:
    /// `context.modify(Context::decrement_life)`.
    pub fn modify<F>(&mut self, f: F)
    where
        F: FnOnce(Context) -> Context,
    {
        *self = f(std::mem::take(self));
    }

    //--- Window -----------------------------------------------------------

    pub fn set_window(self, width: u32, height: u32) -> Self {
        Self {
            window: Window::new(width, height),
            ..self
        }
    }

    //--- Progress ---------------------------------------------------------

    pub fn set_current_level(self, level: LevelId) -> Self {
        Self {
            progress: self.progress.set_current_level(level),
            ..self
        }
    }

    pub fn clear_current_level(self) -> Self {
        Self {
            progress: self.progress.clear_current_level(),
            ..self
        }
    }

    pub fn increment_progress(self, worlds: &Worlds) -> Self {
        Self {
            progress: self.progress.increment(worlds),
            ..self
        }
    }

    //--- Lives ------------------------------------------------------------

    pub fn update_lives(self, now: Timestamp) -> Self {
        Self {
            lives: self.lives.update(now),
            ..self
        }
    }

    pub fn decrement_life(self) -> Self {
        Self {
            lives: self.lives.decrement(),
            ..self
        }
    }

    //--- Menu -------------------------------------------------------------

    pub fn open_menu(self) -> Self {
        Self {
            menu: MenuState::Open,
            ..self
        }
    }

    pub fn close_menu(self) -> Self {
        Self {
            menu: MenuState::Closed,
            ..self
        }
    }

    pub fn disable_menu(self) -> Self {
        Self {
            menu: MenuState::Disabled,
            ..self
        }
    }

    //--- Loading Screen ---------------------------------------------------

    pub fn show_loading_screen(self, color: BackgroundColor) -> Self {
        Self {
            loading_screen: Some(color),
            ..self
        }
    }

    pub fn hide_loading_screen(self) -> Self {
        Self {
            loading_screen: None,
            ..self
        }
    }

    //--- Messages ---------------------------------------------------------

    pub fn next_success_message(self) -> Self {
        Self {
            success_message_index: self.success_message_index.wrapping_add(1),
            ..self
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Window::new(800, 600), Progress::default(), Lives::default(), 0)
    }
}

//=== Effects =============================================================

/// Persists the current lives.
pub fn cache_current_lives<M>(context: &Context) -> Effect<M> {
    Effect::command(Command::CacheLives(context.lives.to_cache()))
}

/// Persists the reached level.
pub fn cache_progress<M>(context: &Context) -> Effect<M> {
    Effect::command(Command::CacheProgress(context.progress.to_cache()))
}

//=== Tests ===============================================================
