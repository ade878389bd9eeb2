//=========================================================================
// Stagehand Library Root
//
// Scene orchestration for a tile-matching puzzle game: scenes, the
// transitions between them, shared player state and the runtime that
// drives it all on a logic thread.
//
// Responsibilities:
// - Expose the engine entry point (`EngineBuilder`, `Engine`)
// - Expose the scene contract and orchestrator for embedding and tests
// - Keep OS integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use stagehand::{EngineBuilder, FileCache};
//
// fn main() {
//     EngineBuilder::new().build(FileCache::open("cache.toml")).run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the orchestration logic (context, scenes, sequencer,
// runtime, view). Embedders that bring their own event loop drive
// `core::runtime::Runtime` directly.
//
// `config` loads engine settings from TOML.
//
pub mod config;
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit window and event loop.
// `engine` wires the runtime, the logic thread and the platform.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::config::{Config, ConfigError};
pub use crate::core::cache::{Cache, CacheBlob, CacheError, FileCache, MemoryCache};
pub use crate::engine::{DispatchError, Dispatcher, Engine, EngineBuilder};
