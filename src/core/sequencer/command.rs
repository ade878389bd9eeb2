//=========================================================================
// Commands
//=========================================================================
//
// Outbound side effects. The core never performs I/O itself; it emits
// commands and the runtime executes them between dispatches.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::{LivesCache, ProgressCache};

//=== Command =============================================================

/// A side effect requested by an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Persist the current lives record.
    CacheLives(LivesCache),

    /// Persist the current progress record.
    CacheProgress(ProgressCache),

    /// Reset all persisted data.
    ClearCache,

    /// Regenerate the bounce keyframes for the given tile size in pixels.
    GenerateBounceKeyframes { tile_size: f64 },

    /// Pick a random background color and feed it back as a message.
    RandomBackground,
}
