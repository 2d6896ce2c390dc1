//=========================================================================
// Jump Control
//=========================================================================
//
// Vertical jump on a key press, allowed only while the object stands on
// something.
//
// Phases:
// ```text
//   Idle ──key + grounded──► Ascent ──3/4 duration──► Glide ──1/4──► Idle
//                            up `step` px             up ceil(step/2) px
//                            every interval           every interval
// ```
//
// Gravity keeps pulling during both phases; the jump only needs to out-
// climb it.
//
//=========================================================================

use std::any::Any;
use std::time::Duration;

use log::debug;

use super::{Control, ControlContext, Subscription};
use crate::core::input::event::{GameEvent, KeyCode, KeyboardEventKind};
use crate::core::object::ObjectId;
use crate::core::spam::Spam;

//=== Constants ===========================================================

pub const DEFAULT_JUMP_DURATION: Duration = Duration::from_millis(500);
pub const DEFAULT_JUMP_INTERVAL: Duration = Duration::from_millis(3);
pub const DEFAULT_VERTICAL_STEP: i32 = 3;

//=== JumpPhase ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpPhase {
    Idle,
    Ascent,
    Glide,
}

//=== JumpYControl ========================================================

#[derive(Debug)]
pub struct JumpYControl {
    object: ObjectId,
    key: KeyCode,
    duration: Duration,
    vertical_step: i32,
    ascent: Spam,
    glide: Spam,
    phase: JumpPhase,
}

impl JumpYControl {
    pub fn new(object: ObjectId) -> Self {
        Self::with_key(object, KeyCode::Space)
    }

    pub fn with_key(object: ObjectId, key: KeyCode) -> Self {
        Self {
            object,
            key,
            duration: DEFAULT_JUMP_DURATION,
            vertical_step: DEFAULT_VERTICAL_STEP,
            ascent: Spam::new(DEFAULT_JUMP_INTERVAL),
            glide: Spam::new(DEFAULT_JUMP_INTERVAL),
            phase: JumpPhase::Idle,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Total jump time. Takes effect with the next jump.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn set_ascent_interval(&mut self, interval: Duration) {
        self.ascent.update_interval(interval);
    }

    pub fn set_glide_interval(&mut self, interval: Duration) {
        self.glide.update_interval(interval);
    }

    pub fn set_vertical_step(&mut self, step: i32) {
        self.vertical_step = step;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn vertical_step(&self) -> i32 {
        self.vertical_step
    }

    pub fn is_jumping(&self) -> bool {
        self.phase != JumpPhase::Idle
    }

    //--- Phases -----------------------------------------------------------

    fn ascent_time(&self) -> Duration {
        self.duration * 3 / 4
    }

    fn glide_step(&self) -> i32 {
        (self.vertical_step + 1) / 2
    }

    fn climb(&self, ctx: &mut ControlContext<'_>, fires: u32, step: i32) {
        if fires == 0 {
            return;
        }
        let Some(mut object) = ctx.object(self.object) else {
            return;
        };
        for _ in 0..fires {
            object.up(step);
        }
    }
}

impl Control for JumpYControl {
    fn object(&self) -> ObjectId {
        self.object
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::Keyboard {
            kind: KeyboardEventKind::Down,
            key: self.key,
        }]
    }

    fn handle(&mut self, event: &GameEvent, ctx: &mut ControlContext<'_>) {
        if event.key_for(KeyboardEventKind::Down) != Some(self.key) || self.is_jumping() {
            return;
        }
        if !ctx.scene.request_jump(self.object) {
            return;
        }

        self.ascent.start(ctx.now, Some(self.ascent_time()));
        self.phase = JumpPhase::Ascent;
        debug!(target: "controls", "{} jumps", self.object);
    }

    fn tick(&mut self, ctx: &mut ControlContext<'_>) {
        if self.phase == JumpPhase::Ascent {
            let glide_start = self.ascent.deadline();
            let fires = self.ascent.poll(ctx.now);
            self.climb(ctx, fires, self.vertical_step);

            if self.ascent.is_running() {
                return;
            }
            let start = glide_start.unwrap_or(ctx.now);
            self.glide.start(start, Some(self.duration - self.ascent_time()));
            self.phase = JumpPhase::Glide;
        }

        if self.phase == JumpPhase::Glide {
            let fires = self.glide.poll(ctx.now);
            self.climb(ctx, fires, self.glide_step());
            if !self.glide.is_running() {
                self.phase = JumpPhase::Idle;
            }
        }
    }

    fn halt(&mut self, _ctx: &mut ControlContext<'_>) {
        self.ascent.stop();
        self.glide.stop();
        self.phase = JumpPhase::Idle;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
