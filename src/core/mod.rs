//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Logic thread of the engine: owns the `GameScreen` and ticks it at a
// fixed rate.
//
// Architecture:
// ```text
//   Platform thread ──PlatformEvent──► EventCollector
//                                           │ collect_frame()
//                                           ▼
//                                      GameScreen::frame(inputs, dt)
//                                           │ scene, listeners, controls
//                                           ▼
//                                      sleep to the next tick
// ```
//
// Nothing else touches the screen while the thread runs, so every scene
// change made during a tick is atomic with respect to the next one.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::thread;
use std::time::{Duration, Instant};

//=== External Dependencies ===============================================

use crossbeam_channel::Receiver;
use log::{debug, info, trace};

//=== Module Declarations =================================================

pub mod camera;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod input;
pub mod message_bus;
pub mod object;
pub mod scene;
pub mod screen;
pub mod spam;
pub mod surface;

pub(crate) mod platform_bridge;

//=== Internal Dependencies ===============================================

use message_bus::CursorRequest;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use screen::GameScreen;

//=== CoreSystemsOrchestrator =============================================

pub(crate) struct CoreSystemsOrchestrator {
    screen: GameScreen,
}

impl CoreSystemsOrchestrator {
    pub(crate) fn new(screen: GameScreen) -> Self {
        Self { screen }
    }

    /// Gives the caller the screen before the logic thread starts.
    pub(crate) fn init_screen<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GameScreen),
    {
        init_fn(&mut self.screen);
    }

    //--- Execution --------------------------------------------------------

    /// Spawns the logic thread ticking the screen `tps` times per second.
    ///
    /// Each tick:
    ///  1. Collects platform events (exits on `WindowClosed`/disconnect)
    ///  2. Applies the last window resize to the camera viewport
    ///  3. Runs one screen frame with the real time since the last tick
    ///  4. Sleeps out the rest of the tick
    pub(crate) fn spawn_core_thread(self, receiver: Receiver<PlatformEvent>, tps: f64) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let mut screen = self.screen;
            let mut collector = EventCollector::new(receiver);
            let mut last_frame = Instant::now();

            info!(target: "engine", "Core thread running at {} TPS", tps);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!(target: "engine", "Core thread exiting");
                    break;
                }

                //--- Step 2: Window changes --------------------------------
                if let Some(size) = collector.resized() {
                    screen.set_viewport(size);
                }

                //--- Step 3: Run the frame ---------------------------------
                let inputs = collector.take_inputs();
                let dt = frame_start.duration_since(last_frame);
                last_frame = frame_start;
                screen.frame(&inputs, dt);

                for request in screen.scene().bus().read::<CursorRequest>() {
                    trace!(target: "engine", "Cursor {:?} requested for {}", request.icon, request.object);
                }

                //--- Step 4: Maintain pacing -------------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                } else {
                    debug!(target: "engine", "Tick overran by {:?}", elapsed - frame_duration);
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
    use crossbeam_channel::bounded;

    use crate::core::geometry::Size;
    use crate::core::object::GameObject;
    use crate::core::scene::Scene;

    #[test]
    fn init_screen_runs_before_start() {
        let mut orchestrator = CoreSystemsOrchestrator::new(GameScreen::new(Scene::new(Size::new(100, 100))));
        orchestrator.init_screen(|screen| {
            screen.scene_mut().add_object(GameObject::new(10, 10));
        });
        assert_eq!(orchestrator.screen.scene().objects().len(), 1);
    }

    #[test]
    fn core_thread_exits_on_window_closed() {
        let orchestrator = CoreSystemsOrchestrator::new(GameScreen::new(Scene::new(Size::new(100, 100))));
        let (tx, rx) = bounded(8);

        let handle = orchestrator.spawn_core_thread(rx, 120.0);
        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert!(handle.join().is_ok());
    }

    #[test]
    fn core_thread_exits_on_disconnect() {
        let orchestrator = CoreSystemsOrchestrator::new(GameScreen::new(Scene::new(Size::new(100, 100))));
        let (tx, rx) = bounded::<PlatformEvent>(8);

        let handle = orchestrator.spawn_core_thread(rx, 120.0);
        drop(tx);

        assert!(handle.join().is_ok());
    }
}
