//=========================================================================
// Scenes
//=========================================================================
//
// Concrete screens hosted by the orchestrator.
//
//   Title ─► Intro ─► Hub ─► (Tutorial over Level) ─► Level
//                      ▲                                 │
//                      │       ┌─ Retry  (over Level) ◄──┤ Lose
//                      └───────┼─ Summary (over Level) ◄─┘ Win
//                              └─ Garden
//
//=========================================================================

//=== Module Declarations =================================================

mod garden;
mod hub;
mod intro;
mod level;
mod retry;
mod summary;
mod title;
mod tutorial;

//=== Public API ==========================================================

pub use garden::{Garden, GardenMsg};
pub use hub::{Hub, HubDestination, HubFlags, HubMsg};
pub use intro::{Intro, IntroMsg};
pub use level::{Level, LevelMsg, LevelStatus};
pub use retry::{Retry, RetryDestination, RetryMsg};
pub use summary::{Summary, SummaryDestination, SummaryFlags, SummaryMsg};
pub use title::{Title, TitleDestination, TitleMsg};
pub use tutorial::{Tutorial, TutorialMsg};
