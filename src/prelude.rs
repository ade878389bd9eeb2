//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagehand::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Dispatcher, Engine, EngineBuilder};
pub use crate::config::Config;

// Runtime and persistence
pub use crate::core::cache::{Cache, FileCache, MemoryCache};
pub use crate::core::runtime::Runtime;

// Shared state
pub use crate::core::context::{Context, LevelId, Lives, Progress, Window, Worlds};

// Scene system
pub use crate::core::scene::{ExitStatus, Msg, Orchestrator, Scene, SceneKey, SceneMsg, Settings};

// Effects
pub use crate::core::sequencer::{sequence, trigger, Command, Effect, Timestamp};

// View
pub use crate::core::view::{MenuOption, Node};
