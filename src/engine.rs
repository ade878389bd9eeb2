//=========================================================================
// Stagehand Engine
//
// Main entry point: wires the runtime, the core thread and the platform.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(cache)──>  Engine  ──run()──>  [Threads]
//         │                               │
//         ├─ with_tps()                   ├─ dispatcher()
//         ├─ with_channel_capacity()      └─ spawns core thread
//         ├─ with_settings()                 runs platform
//         ├─ with_window()                   blocks until exit
//         └─ with_frame_sender()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::config::Config;
use crate::core::cache::Cache;
use crate::core::context::Window;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::runtime::Runtime;
use crate::core::scene::{Msg, Settings};
use crate::core::sequencer::Timestamp;
use crate::core::view::Node;
use crate::core::CoreLoop;
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Window**: "Seeds", 800x600
///
/// # Examples
///
/// ```no_run
/// use stagehand::{EngineBuilder, FileCache};
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .build(FileCache::open("cache.toml"))
///     .run();
/// ```
///
/// From a config file:
/// ```no_run
/// use std::path::Path;
/// use stagehand::{Config, EngineBuilder, FileCache};
///
/// let config = Config::load_or_default(Path::new("stagehand.toml"));
/// EngineBuilder::from_config(&config)
///     .build(FileCache::open(&config.cache.path))
///     .run();
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    settings: Settings,
    window_title: String,
    window: Window,
    frames: Option<Sender<Node<Msg>>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            settings: Settings::default(),
            window_title: "Seeds".into(),
            window: Window::new(800, 600),
            frames: None,
        }
    }

    /// Creates a builder from a loaded [`Config`].
    ///
    /// # Panics
    ///
    /// Panics if the config carries a non-positive tps or channel
    /// capacity. [`Config::parse`] already rejects both.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_tps(config.engine.tps)
            .with_channel_capacity(config.engine.channel_capacity)
            .with_window(
                config.engine.window_title.clone(),
                config.engine.window_width,
                config.engine.window_height,
            )
            .with_settings(config.settings())
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the session rules (level catalog, transition timing, lives).
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the window title and initial logical size.
    pub fn with_window(mut self, title: impl Into<String>, width: u32, height: u32) -> Self {
        self.window_title = title.into();
        self.window = Window::new(width, height);
        self
    }

    /// Receives every composed frame that differs from the previous one.
    pub fn with_frame_sender(mut self, frames: Sender<Node<Msg>>) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Builds the engine around `cache`.
    ///
    /// The event channel exists from here on, so dispatchers taken before
    /// [`Engine::run`] already queue messages.
    pub fn build<C: Cache + Send + 'static>(self, cache: C) -> Engine<C> {
        info!("Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        let (sender, receiver) = bounded(self.channel_capacity);

        Engine {
            cache,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            settings: self.settings,
            window_title: self.window_title,
            window: self.window,
            frames: self.frames,
            sender,
            receiver,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Dispatcher ==========================================================

/// Returned when the core thread has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Core thread is not running")]
pub struct DispatchError;

/// Handle for injecting messages into a running engine from any thread.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    sender: Sender<PlatformEvent>,
}

impl Dispatcher {
    /// Queues `msg` for the next core tick. Blocks while the channel is
    /// full.
    pub fn send(&self, msg: Msg) -> Result<(), DispatchError> {
        self.sender
            .send(PlatformEvent::Message(msg))
            .map_err(|_| DispatchError)
    }
}

//=== Engine ==============================================================

/// Stagehand runtime host.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreLoop (Logic Thread @ TPS)
///   │     └─► Runtime → Orchestrator → Scenes
///   │
///   └─► Platform (Event Loop)
///         └─► Window, resize forwarding
///
/// Communication: bounded channel (PlatformEvent)
/// ```
pub struct Engine<C: Cache> {
    cache: C,
    tps: f64,
    channel_capacity: usize,
    settings: Settings,
    window_title: String,
    window: Window,
    frames: Option<Sender<Node<Msg>>>,
    sender: Sender<PlatformEvent>,
    receiver: Receiver<PlatformEvent>,
}

impl<C: Cache + Send + 'static> Engine<C> {
    /// A new handle for injecting messages.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            sender: self.sender.clone(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Starts the runtime from the cache at wall-clock time
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: platform sends `WindowClosed` → logic thread ends
    pub fn run(self) {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Start the runtime ----------------------------------------
        let runtime = Runtime::new(Timestamp::now(), self.window, self.cache, self.settings);
        let core = CoreLoop::new(runtime, self.frames);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = core.spawn_core_thread(self.receiver, self.tps);
        info!("Core logic thread spawned (channel: {})", self.channel_capacity);

        //--- 3. Launch the platform subsystem -----------------------------
        let shutdown = self.sender.clone();
        let platform = Platform::new(self.sender, self.window_title, self.window);
        info!("Platform initialized, entering event loop");

        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: Wait for logic thread to terminate --------------
        // Dispatchers may still hold senders, so disconnection alone is
        // not enough to stop the core thread.
        if shutdown.send(PlatformEvent::WindowClosed).is_err() {
            debug!("Core thread already stopped");
        }

        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }

        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
