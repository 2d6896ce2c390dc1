//=========================================================================
// Event Collector
//=========================================================================
//
// Logic-thread end of the platform channel.
//
// ```text
//   Receiver<PlatformEvent>
//      │  collect_frame()  (at most DRAIN_LIMIT messages)
//      ├─ Inputs      → inputs: discrete then continuous, arrival order
//      ├─ Resized     → resized: last one of the frame
//      └─ WindowClosed / disconnect → TickControl::Exit
// ```
//
// Whatever is left past the limit waits for the next frame. A frame that
// received nothing backs off for IDLE_BACKOFF.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::mem;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::geometry::Size;
use crate::core::input::event::InputEvent;

//=== Constants ===========================================================

/// Channel messages handled per frame.
const DRAIN_LIMIT: usize = 100;

const IDLE_BACKOFF: Duration = Duration::from_millis(10);

//=== TickControl =========================================================

/// Whether the core loop keeps running after this frame's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Per-frame view of what the platform thread sent.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    inputs: Vec<InputEvent>,
    resized: Option<Size>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            inputs: Vec::new(),
            resized: None,
        }
    }

    /// Drops the previous frame's state and reads the channel.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.inputs.clear();
        self.resized = None;

        let mut received = 0;
        while received < DRAIN_LIMIT {
            let event = match self.receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!(target: "engine", "Platform channel disconnected");
                    return TickControl::Exit;
                }
            };
            received += 1;

            match event {
                PlatformEvent::Inputs { discrete, continuous } => {
                    self.inputs.extend(discrete);
                    self.inputs.extend(continuous);
                }
                PlatformEvent::Resized { width, height } => {
                    self.resized = Some(Size::new(clamp_dimension(width), clamp_dimension(height)));
                }
                PlatformEvent::WindowClosed => return TickControl::Exit,
            }
        }

        match received {
            0 => thread::sleep(IDLE_BACKOFF),
            DRAIN_LIMIT => warn!(target: "engine", "Platform backlog: {} messages left for next frame", self.receiver.len()),
            n => trace!(target: "engine", "Collected {} platform messages", n),
        }

        TickControl::Continue
    }

    /// Hands over this frame's input, in arrival order.
    pub(crate) fn take_inputs(&mut self) -> Vec<InputEvent> {
        mem::take(&mut self.inputs)
    }

    /// Latest window size reported this frame.
    pub(crate) fn resized(&self) -> Option<Size> {
        self.resized
    }
}

fn clamp_dimension(px: u32) -> i32 {
    i32::try_from(px).unwrap_or(i32::MAX)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};
    use crossbeam_channel::{unbounded, Sender};

    fn collector() -> (Sender<PlatformEvent>, EventCollector) {
        let (tx, rx) = unbounded();
        (tx, EventCollector::new(rx))
    }

    fn key(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    fn keys(discrete: Vec<InputEvent>) -> PlatformEvent {
        PlatformEvent::Inputs {
            discrete,
            continuous: Vec::new(),
        }
    }

    #[test]
    fn idle_frame_has_no_input() {
        let (_tx, mut collector) = collector();
        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.take_inputs().is_empty());
        assert_eq!(collector.resized(), None);
    }

    #[test]
    fn cursor_follows_keys_of_the_same_batch() {
        let (tx, mut collector) = collector();
        tx.send(PlatformEvent::Inputs {
            discrete: vec![key(KeyCode::KeyA)],
            continuous: vec![InputEvent::MouseMoved { x: 1.0, y: 2.0 }],
        })
        .unwrap();
        tx.send(keys(vec![key(KeyCode::Space)])).unwrap();

        collector.collect_frame();

        assert_eq!(
            collector.take_inputs(),
            vec![
                key(KeyCode::KeyA),
                InputEvent::MouseMoved { x: 1.0, y: 2.0 },
                key(KeyCode::Space),
            ]
        );
    }

    #[test]
    fn input_does_not_leak_into_next_frame() {
        let (tx, mut collector) = collector();
        tx.send(keys(vec![key(KeyCode::KeyW)])).unwrap();

        collector.collect_frame();
        collector.collect_frame();

        assert!(collector.take_inputs().is_empty());
    }

    #[test]
    fn backlog_is_split_across_frames() {
        let (tx, mut collector) = collector();
        for _ in 0..DRAIN_LIMIT + 20 {
            tx.send(keys(vec![key(KeyCode::KeyD)])).unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.take_inputs().len(), DRAIN_LIMIT);

        collector.collect_frame();
        assert_eq!(collector.take_inputs().len(), 20);
    }

    #[test]
    fn last_resize_of_the_frame_wins() {
        let (tx, mut collector) = collector();
        tx.send(PlatformEvent::Resized { width: 640, height: 480 }).unwrap();
        tx.send(PlatformEvent::Resized { width: 1024, height: 768 }).unwrap();

        collector.collect_frame();
        assert_eq!(collector.resized(), Some(Size::new(1024, 768)));

        collector.collect_frame();
        assert_eq!(collector.resized(), None);
    }

    #[test]
    fn oversized_resize_is_clamped() {
        let (tx, mut collector) = collector();
        tx.send(PlatformEvent::Resized { width: u32::MAX, height: 10 }).unwrap();

        collector.collect_frame();
        assert_eq!(collector.resized(), Some(Size::new(i32::MAX, 10)));
    }

    #[test]
    fn close_stops_the_loop() {
        let (tx, mut collector) = collector();
        tx.send(PlatformEvent::WindowClosed).unwrap();
        tx.send(keys(vec![key(KeyCode::KeyS)])).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn dropped_sender_stops_the_loop() {
        let (tx, mut collector) = collector();
        drop(tx);
        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }
}
