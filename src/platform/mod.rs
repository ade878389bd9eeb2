//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core thread via channel.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  CoreLoop        │
//  │   ↓                      │    │   ↓              │
//  │  Resized                 │    │  Runtime         │
//  │   ↓                      │    │   ↓              │
//  │  ResizeBuffer            │    │  Orchestrator    │
//  │   └─ latest size only    │    │                  │
//  │   ↓                      │    └──────────────────┘
//  │  RedrawRequested         │             ↑
//  │   ↓ (flush)              │             │
//  │  Channel ────────────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
//
//  Frame Boundary: RedrawRequested
//    → Latest window size sent, if it changed
//    → Core ticks at fixed TPS (independent of refresh rate)
// ```
//
// Notes:
// - Winit mandates the main thread on macOS/iOS, so this runs on the
//   thread that called `Engine::run()`
// - If the core thread is gone, events are dropped with a warning and the
//   window stays up until the user closes it
//
//=========================================================================

//=== Submodules ==========================================================

mod resize_buffer;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::context::Window as WindowSize;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use resize_buffer::ResizeBuffer;

//=== Platform ============================================================

/// Window owner and resize forwarder.
///
/// Runs on the main thread and talks to the core thread only through
/// the event sender.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    title: String,
    initial_size: WindowSize,

    /// Pending window size until the next frame boundary.
    buffer: ResizeBuffer,

    /// Channel to the core thread.
    event_sender: Sender<PlatformEvent>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates the platform. The window itself is created in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, title: String, initial_size: WindowSize) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title,
            initial_size,
            buffer: ResizeBuffer::new(),
            event_sender,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends the pending window size to the core thread, if any.
    fn flush_resize_buffer(&mut self) {
        if let Some((width, height)) = self.buffer.take() {
            trace!(target: "platform", "Flushing window size {}x{}", width, height);

            if self
                .event_sender
                .send(PlatformEvent::Resized { width, height })
                .is_err()
            {
                warn!(
                    target: "platform",
                    "Channel disconnected, dropping window size {}x{}",
                    width,
                    height
                );
            }
        }
    }

    fn send_close(&self) {
        if self.event_sender.send(PlatformEvent::WindowClosed).is_err() {
            debug!(target: "platform", "Core thread already gone");
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on startup (and on mobile resume if it was lost).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.initial_size.width, self.initial_size.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.buffer.push(size.width, size.height);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send_close();
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send_close();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                trace!(target: "platform", "Resized to {}x{}", size.width, size.height);
                self.buffer.push(size.width, size.height);
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary
                self.flush_resize_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn platform(sender: Sender<PlatformEvent>) -> Platform {
        Platform::new(sender, "Test".into(), WindowSize::new(800, 600))
    }

    #[test]
    fn platform_creation() {
        let (tx, _rx) = unbounded();
        let platform = platform(tx);
        assert!(platform.window().is_none(), "Window should be created lazily");
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);

        platform.flush_resize_buffer();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_latest_size_once() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);

        platform.buffer.push(1024, 768);
        platform.buffer.push(1280, 720);
        platform.flush_resize_buffer();
        platform.flush_resize_buffer();

        assert_eq!(rx.try_recv().ok(), Some(PlatformEvent::Resized { width: 1280, height: 720 }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (tx, rx) = unbounded();
        let mut platform = platform(tx);
        platform.buffer.push(640, 480);

        drop(rx);

        // Logs and carries on.
        platform.flush_resize_buffer();
    }

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }
}
