//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the platform thread and the core loop.
//
// Components:
// - `interface`: Event and error types crossing the thread boundary
// - `event_collector`: Core-side draining of those events into messages
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::{PlatformError, PlatformEvent};
