//=========================================================================
// Core Loop
//=========================================================================
//
// Logic thread hosting the runtime, decoupled from the platform thread.
//
// Architecture:
//   Receiver<PlatformEvent> → EventCollector → Vec<Msg>
//                                                 ↓
//                                   Runtime::dispatch / advance_to
//                                                 ↓
//                                   composed frame → Sender<Node<Msg>>
//
// Each tick:
//   1. Drains platform events (resizes, injected messages, close)
//   2. Advances the clock to wall time, dispatches the events, then fires
//      whatever they scheduled for right now
//   3. Publishes the frame if it differs from the last one
//   4. Sleeps out the rest of the tick
//
// Events drained together with `WindowClosed` still get their tick.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod cache;
pub mod context;
pub(crate) mod platform_bridge;
pub mod runtime;
pub mod scene;
pub mod scenes;
pub mod sequencer;
pub mod view;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use log::{info, warn};

//=== Internal Dependencies ===============================================

use cache::Cache;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use runtime::Runtime;
use scene::Msg;
use sequencer::Timestamp;
use view::Node;

//=== CoreLoop ============================================================

pub(crate) struct CoreLoop<C: Cache> {
    runtime: Runtime<C>,
    frames: Option<Sender<Node<Msg>>>,
    last_frame: Option<Node<Msg>>,
}

impl<C: Cache> CoreLoop<C> {
    pub(crate) fn new(runtime: Runtime<C>, frames: Option<Sender<Node<Msg>>>) -> Self {
        Self {
            runtime,
            frames,
            last_frame: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn runtime(&self) -> &Runtime<C> {
        &self.runtime
    }

    //--- tick() -----------------------------------------------------------

    /// Runs one logic step at `now`. Timers due by `now` fire before the
    /// collected messages, so delays those messages schedule start at
    /// `now`.
    pub(crate) fn tick(&mut self, messages: Vec<Msg>, now: Timestamp) {
        self.runtime.advance_to(now);
        for msg in messages {
            self.runtime.dispatch(msg);
        }
        self.runtime.advance_to(now);
        self.publish_frame();
    }

    fn publish_frame(&mut self) {
        let Some(frames) = &self.frames else {
            return;
        };

        let frame = self.runtime.view();
        if self.last_frame.as_ref() == Some(&frame) {
            return;
        }

        if frames.send(frame.clone()).is_err() {
            warn!(target: "runtime", "Frame receiver gone, no longer publishing frames");
            self.frames = None;
            return;
        }
        self.last_frame = Some(frame);
    }
}

impl<C: Cache + Send + 'static> CoreLoop<C> {
    //--- spawn_core_thread() ---------------------------------------------

    /// Moves the loop onto its own thread ticking at `tps`.
    ///
    /// The thread ends on `WindowClosed` or when every sender is gone.
    pub(crate) fn spawn_core_thread(
        mut self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let mut collector = EventCollector::new(receiver);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                let control = collector.collect_frame();

                //--- Step 2: Update the runtime ----------------------------
                self.tick(collector.take_messages(), Timestamp::now());

                if control == TickControl::Exit {
                    info!(target: "runtime", "Core thread exiting.");
                    break;
                }

                //--- Step 3: Maintain fixed pacing -------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryCache;
    use crate::core::context::{LevelId, Window};
    use crate::core::scene::{SceneKey, Settings};
    use crossbeam_channel::unbounded;

    const T0: u64 = 1_000_000;

    fn core_loop(frames: Option<Sender<Node<Msg>>>) -> CoreLoop<MemoryCache> {
        let runtime = Runtime::with_rng(
            Timestamp::from_millis(T0),
            Window::new(800, 600),
            MemoryCache::default(),
            Settings::default(),
            fastrand::Rng::with_seed(7),
        );
        CoreLoop::new(runtime, frames)
    }

    #[test]
    fn tick_dispatches_then_advances() {
        let mut core = core_loop(None);

        core.tick(vec![Msg::GoToHub(LevelId::FIRST)], Timestamp::from_millis(T0 + 16));

        assert_eq!(core.runtime().orchestrator().scene().key(), SceneKey::Hub);
        assert_eq!(core.runtime().now(), Timestamp::from_millis(T0 + 16));
    }

    #[test]
    fn delays_start_at_the_tick_time() {
        let mut core = core_loop(None);

        core.tick(vec![Msg::InitLevel(LevelId::new(1, 2))], Timestamp::from_millis(T0 + 500));

        // Board reveal is 600ms after the level opens.
        assert_eq!(core.runtime().next_wakeup(), Timestamp::from_millis(T0 + 1100));
    }

    #[test]
    fn unchanged_frames_are_published_once() {
        let (tx, rx) = unbounded();
        let mut core = core_loop(Some(tx));

        core.tick(Vec::new(), Timestamp::from_millis(T0 + 16));
        core.tick(Vec::new(), Timestamp::from_millis(T0 + 32));
        assert_eq!(rx.try_iter().count(), 1);

        core.tick(vec![Msg::GoToHub(LevelId::FIRST)], Timestamp::from_millis(T0 + 48));
        let frame = rx.try_recv().unwrap();
        assert!(frame.find_key("hub").is_some());
    }

    #[test]
    fn dropped_frame_receiver_stops_publishing() {
        let (tx, rx) = unbounded();
        let mut core = core_loop(Some(tx));
        drop(rx);

        core.tick(Vec::new(), Timestamp::from_millis(T0 + 16));
        assert!(core.frames.is_none());
    }

    #[test]
    fn core_thread_exits_on_window_closed() {
        let (tx, rx) = unbounded();
        let handle = core_loop(None).spawn_core_thread(rx, 240.0);

        tx.send(PlatformEvent::Message(Msg::GoToHub(LevelId::FIRST))).unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert!(handle.join().is_ok());
    }

    #[test]
    fn messages_queued_with_window_closed_still_run() {
        let (tx, rx) = unbounded();
        let (frames_tx, frames_rx) = unbounded();

        tx.send(PlatformEvent::Message(Msg::GoToHub(LevelId::FIRST))).unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        let handle = core_loop(Some(frames_tx)).spawn_core_thread(rx, 240.0);
        assert!(handle.join().is_ok());

        let last = frames_rx.try_iter().last().unwrap();
        assert!(last.find_key("hub").is_some());
    }
}
