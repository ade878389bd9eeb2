//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events and errors).
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;
use winit::error::EventLoopError;

//=== Internal Dependencies ===============================================

use crate::core::scene::Msg;

//=== PlatformEvent =======================================================

/// Events sent to the core loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Latest window size of a frame, in physical pixels.
    Resized { width: u32, height: u32 },

    /// Message injected by the embedding application.
    Message(Msg),

    /// Window close requested.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug, Error)]
pub(crate) enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}
