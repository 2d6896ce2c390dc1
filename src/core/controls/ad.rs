//=========================================================================
// AD Control
//=========================================================================
//
// Side-scroller run control: A runs left, D runs right.
//
// Besides moving, the control reports whether its object is running.
// The status turns `Active` on the first move and `Inactive` when the
// last held run key is released. Every change goes to the registered
// status listeners and onto the scene bus as a `ControlStatus` message.
//
//=========================================================================

use std::any::Any;
use std::time::Duration;

use log::debug;

use super::{Control, ControlContext, Direction, Subscription};
use crate::core::input::event::{GameEvent, KeyCode, KeyboardEventKind};
use crate::core::message_bus::ControlStatus;
use crate::core::object::ObjectId;
use crate::core::spam::Spam;

//=== Constants ===========================================================

pub const DEFAULT_RUN_INTERVAL: Duration = Duration::from_millis(2);

const LEFT_KEY: KeyCode = KeyCode::KeyA;
const RIGHT_KEY: KeyCode = KeyCode::KeyD;

//=== RunningStatus =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunningStatus {
    Active,
    Inactive,
}

pub type StatusCallback = Box<dyn FnMut(RunningStatus) + Send>;

//=== AdControl ===========================================================

pub struct AdControl {
    object: ObjectId,
    left: Spam,
    right: Spam,
    left_held: bool,
    right_held: bool,
    status: RunningStatus,
    status_listeners: Vec<StatusCallback>,
}

impl AdControl {
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            left: Spam::new(DEFAULT_RUN_INTERVAL),
            right: Spam::new(DEFAULT_RUN_INTERVAL),
            left_held: false,
            right_held: false,
            status: RunningStatus::Inactive,
            status_listeners: Vec::new(),
        }
    }

    /// Registers a callback for running status changes.
    pub fn on_status_change(&mut self, callback: impl FnMut(RunningStatus) + Send + 'static) {
        self.status_listeners.push(Box::new(callback));
    }

    pub fn update_spam_delay(&mut self, interval: Duration) {
        self.left.update_interval(interval);
        self.right.update_interval(interval);
    }

    pub fn spam_delay(&self) -> Duration {
        self.left.interval()
    }

    pub fn status(&self) -> RunningStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunningStatus::Active
    }

    fn set_status(&mut self, status: RunningStatus, ctx: &mut ControlContext<'_>) {
        if self.status == status {
            return;
        }
        self.status = status;
        debug!(target: "controls", "{} running status {:?}", self.object, status);

        for listener in &mut self.status_listeners {
            listener(status);
        }
        ctx.scene.bus_mut().push(ControlStatus {
            control: ctx.id,
            object: self.object,
            status,
        });
    }

    fn run(&mut self, direction: Direction, fires: u32, ctx: &mut ControlContext<'_>) {
        if fires == 0 {
            return;
        }
        let Some(mut object) = ctx.object(self.object) else {
            return;
        };
        for _ in 0..fires {
            direction.step(&mut object, 1);
        }
        self.set_status(RunningStatus::Active, ctx);
    }
}

impl Control for AdControl {
    fn object(&self) -> ObjectId {
        self.object
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        [LEFT_KEY, RIGHT_KEY]
            .into_iter()
            .flat_map(|key| {
                [
                    Subscription::Keyboard { kind: KeyboardEventKind::Down, key },
                    Subscription::Keyboard { kind: KeyboardEventKind::Up, key },
                ]
            })
            .collect()
    }

    fn handle(&mut self, event: &GameEvent, ctx: &mut ControlContext<'_>) {
        let GameEvent::Keyboard { kind, key, .. } = event else {
            return;
        };

        match (*kind, *key) {
            (KeyboardEventKind::Down, LEFT_KEY) => {
                self.left_held = true;
                self.left.start(ctx.now, None);
            }
            (KeyboardEventKind::Down, RIGHT_KEY) => {
                self.right_held = true;
                self.right.start(ctx.now, None);
            }
            (KeyboardEventKind::Up, LEFT_KEY) => {
                self.left_held = false;
                self.left.stop();
                if !self.right_held {
                    self.set_status(RunningStatus::Inactive, ctx);
                }
            }
            (KeyboardEventKind::Up, RIGHT_KEY) => {
                self.right_held = false;
                self.right.stop();
                if !self.left_held {
                    self.set_status(RunningStatus::Inactive, ctx);
                }
            }
            _ => {}
        }
    }

    fn tick(&mut self, ctx: &mut ControlContext<'_>) {
        let left = self.left.poll(ctx.now);
        self.run(Direction::Left, left, ctx);
        let right = self.right.poll(ctx.now);
        self.run(Direction::Right, right, ctx);
    }

    fn halt(&mut self, ctx: &mut ControlContext<'_>) {
        self.left.stop();
        self.right.stop();
        self.left_held = false;
        self.right_held = false;
        self.set_status(RunningStatus::Inactive, ctx);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl std::fmt::Debug for AdControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdControl")
            .field("object", &self.object)
            .field("status", &self.status)
            .field("left_held", &self.left_held)
            .field("right_held", &self.right_held)
            .field("status_listeners", &self.status_listeners.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
