//=========================================================================
// Follow Cursor Controls
//=========================================================================
//
// The object crawls towards the mouse pointer, one pixel per fire, on
// each axis independently.
//
// Chase Loop:
// ```text
//   Move(scene) ─► cursor = client pos
//                  for each direction with distance > threshold:
//                      start that direction's spam
//   tick        ─► per fire: distance > 0 ? step 1px : stop the spam
// ```
//
// Distances compare the cursor (window coordinates) with the object's
// on-screen centre, so a following camera does not throw the chase off.
//
// `FollowCursorOnMoveControl` chases all the time. The click variant
// toggles the chase with a press on the object.
//
//=========================================================================

use std::any::Any;
use std::time::Duration;

use log::debug;

use super::{Control, ControlContext, Direction, Subscription};
use crate::core::input::event::{GameEvent, MouseEventKind, MouseTarget};
use crate::core::object::ObjectId;
use crate::core::scene::Scene;
use crate::core::spam::Spam;

//=== Constants ===========================================================

/// Period of the 1px chase steps.
pub const DEFAULT_SMOOTHNESS: Duration = Duration::from_millis(4);

/// Distance (px) under which a cursor move does not restart a chase.
pub const DEFAULT_RADIUS_THRESHOLD: f32 = 2.0;

//=== CursorChaser ========================================================

#[derive(Debug)]
struct CursorChaser {
    object: ObjectId,
    /// Indexed by `Direction::index`.
    spams: [Spam; 4],
    cursor: Option<(f32, f32)>,
    threshold: f32,
}

impl CursorChaser {
    fn new(object: ObjectId) -> Self {
        Self {
            object,
            spams: std::array::from_fn(|_| Spam::new(DEFAULT_SMOOTHNESS)),
            cursor: None,
            threshold: DEFAULT_RADIUS_THRESHOLD,
        }
    }

    fn set_smoothness(&mut self, interval: Duration) {
        for spam in &mut self.spams {
            spam.update_interval(interval);
        }
    }

    /// Signed distance left to travel in `direction`.
    fn distance(&self, scene: &Scene, direction: Direction) -> Option<f32> {
        let (cursor_x, cursor_y) = self.cursor?;
        let object = scene.object(self.object)?;
        let offset = scene.camera().map(|c| c.offset()).unwrap_or_default();

        let (centre_x, centre_y) = object.center();
        let dx = cursor_x - (centre_x - offset.x as f32);
        let dy = cursor_y - (centre_y - offset.y as f32);

        Some(match direction {
            Direction::Right => dx,
            Direction::Left => -dx,
            Direction::Down => dy,
            Direction::Up => -dy,
        })
    }

    fn track(&mut self, client_x: f32, client_y: f32) {
        self.cursor = Some((client_x, client_y));
    }

    /// Starts every direction whose distance exceeds the threshold.
    fn chase(&mut self, scene: &Scene, now: Duration) {
        for direction in Direction::ALL {
            let Some(distance) = self.distance(scene, direction) else {
                return;
            };
            if distance > self.threshold {
                self.spams[direction.index()].start(now, None);
            }
        }
    }

    fn tick(&mut self, ctx: &mut ControlContext<'_>) {
        for direction in Direction::ALL {
            let fires = self.spams[direction.index()].poll(ctx.now);
            for _ in 0..fires {
                let remaining = self.distance(ctx.scene, direction).unwrap_or(0.0);
                if remaining <= 0.0 {
                    self.spams[direction.index()].stop();
                    break;
                }
                let Some(mut object) = ctx.object(self.object) else {
                    return;
                };
                direction.step(&mut object, 1);
            }
        }
    }

    fn stop(&mut self) {
        for spam in &mut self.spams {
            spam.stop();
        }
    }

    fn is_chasing(&self) -> bool {
        self.spams.iter().any(Spam::is_running)
    }
}

//=== FollowCursorOnMoveControl ===========================================

#[derive(Debug)]
pub struct FollowCursorOnMoveControl {
    chaser: CursorChaser,
}

impl FollowCursorOnMoveControl {
    pub fn new(object: ObjectId) -> Self {
        Self {
            chaser: CursorChaser::new(object),
        }
    }

    /// Interval between 1px steps. Lower is faster.
    pub fn set_smoothness(&mut self, interval: Duration) {
        self.chaser.set_smoothness(interval);
    }

    pub fn set_radius_threshold(&mut self, threshold: f32) {
        self.chaser.threshold = threshold;
    }

    pub fn radius_threshold(&self) -> f32 {
        self.chaser.threshold
    }

    pub fn is_chasing(&self) -> bool {
        self.chaser.is_chasing()
    }
}

impl Control for FollowCursorOnMoveControl {
    fn object(&self) -> ObjectId {
        self.chaser.object
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::Mouse {
            kind: MouseEventKind::Move,
            target: MouseTarget::Scene,
        }]
    }

    fn handle(&mut self, event: &GameEvent, ctx: &mut ControlContext<'_>) {
        if let Some((MouseEventKind::Move, _, payload)) = event.mouse() {
            self.chaser.track(payload.client_x, payload.client_y);
            self.chaser.chase(ctx.scene, ctx.now);
        }
    }

    fn tick(&mut self, ctx: &mut ControlContext<'_>) {
        self.chaser.tick(ctx);
    }

    fn halt(&mut self, _ctx: &mut ControlContext<'_>) {
        self.chaser.stop();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== FollowCursorOnClickControl ==========================================

#[derive(Debug)]
pub struct FollowCursorOnClickControl {
    chaser: CursorChaser,
    following: bool,
}

impl FollowCursorOnClickControl {
    pub fn new(object: ObjectId) -> Self {
        Self {
            chaser: CursorChaser::new(object),
            following: false,
        }
    }

    pub fn set_smoothness(&mut self, interval: Duration) {
        self.chaser.set_smoothness(interval);
    }

    pub fn set_radius_threshold(&mut self, threshold: f32) {
        self.chaser.threshold = threshold;
    }

    /// True between the press that picked the object up and the next.
    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn is_chasing(&self) -> bool {
        self.chaser.is_chasing()
    }
}

impl Control for FollowCursorOnClickControl {
    fn object(&self) -> ObjectId {
        self.chaser.object
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        vec![
            Subscription::Mouse {
                kind: MouseEventKind::Down,
                target: MouseTarget::Object(self.chaser.object),
            },
            Subscription::Mouse {
                kind: MouseEventKind::Move,
                target: MouseTarget::Scene,
            },
        ]
    }

    fn handle(&mut self, event: &GameEvent, ctx: &mut ControlContext<'_>) {
        let Some((kind, _, payload)) = event.mouse() else {
            return;
        };

        match kind {
            MouseEventKind::Down => {
                self.following = !self.following;
                debug!(target: "controls", "{} follows cursor: {}", self.chaser.object, self.following);
                if !self.following {
                    self.chaser.stop();
                }
            }
            MouseEventKind::Move => {
                self.chaser.track(payload.client_x, payload.client_y);
                if self.following {
                    self.chaser.chase(ctx.scene, ctx.now);
                }
            }
            _ => {}
        }
    }

    fn tick(&mut self, ctx: &mut ControlContext<'_>) {
        self.chaser.tick(ctx);
    }

    fn halt(&mut self, _ctx: &mut ControlContext<'_>) {
        self.following = false;
        self.chaser.stop();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controls::ControlId;
    use crate::core::geometry::Size;
    use crate::core::input::event::MousePayload;
    use crate::core::object::GameObject;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn event(kind: MouseEventKind, target: MouseTarget, x: f32, y: f32) -> GameEvent {
        GameEvent::Mouse {
            kind,
            target,
            payload: MousePayload {
                client_x: x,
                client_y: y,
                stage_x: x,
                stage_y: y,
                button: None,
            },
        }
    }

    fn setup() -> (Scene, ObjectId) {
        let mut scene = Scene::new(Size::new(800, 600));
        // Centre at (110, 110).
        let id = scene.add_object(GameObject::new(20, 20).at(100, 100));
        (scene, id)
    }

    #[test]
    fn chases_until_centre_reaches_cursor() {
        let (mut scene, id) = setup();
        let mut control = FollowCursorOnMoveControl::new(id);

        let mut ctx = ControlContext { scene: &mut scene, now: ms(0), id: ControlId::next() };
        control.handle(&event(MouseEventKind::Move, MouseTarget::Scene, 120.0, 105.0), &mut ctx);
        assert!(control.is_chasing());

        ctx.now = ms(400);
        control.tick(&mut ctx);

        let obj = ctx.scene.object(id).unwrap();
        assert_eq!((obj.x(), obj.y()), (110, 95));
        assert!(!control.is_chasing());
    }

    #[test]
    fn small_moves_stay_under_threshold() {
        let (mut scene, id) = setup();
        let mut control = FollowCursorOnMoveControl::new(id);

        let mut ctx = ControlContext { scene: &mut scene, now: ms(0), id: ControlId::next() };
        control.handle(&event(MouseEventKind::Move, MouseTarget::Scene, 111.5, 109.0), &mut ctx);
        assert!(!control.is_chasing());
    }

    #[test]
    fn step_rate_follows_smoothness() {
        let (mut scene, id) = setup();
        let mut control = FollowCursorOnMoveControl::new(id);
        control.set_smoothness(ms(10));

        let mut ctx = ControlContext { scene: &mut scene, now: ms(0), id: ControlId::next() };
        control.handle(&event(MouseEventKind::Move, MouseTarget::Scene, 300.0, 110.0), &mut ctx);
        ctx.now = ms(50);
        control.tick(&mut ctx);

        assert_eq!(scene.object(id).unwrap().x(), 105);
    }

    #[test]
    fn click_variant_toggles_chase() {
        let (mut scene, id) = setup();
        let mut control = FollowCursorOnClickControl::new(id);
        let own = MouseTarget::Object(id);

        let mut ctx = ControlContext { scene: &mut scene, now: ms(0), id: ControlId::next() };
        control.handle(&event(MouseEventKind::Move, MouseTarget::Scene, 300.0, 110.0), &mut ctx);
        assert!(!control.is_chasing(), "not picked up yet");

        control.handle(&event(MouseEventKind::Down, own, 110.0, 110.0), &mut ctx);
        assert!(control.is_following());
        control.handle(&event(MouseEventKind::Move, MouseTarget::Scene, 300.0, 110.0), &mut ctx);
        assert!(control.is_chasing());

        ctx.now = ms(8);
        control.tick(&mut ctx);
        control.handle(&event(MouseEventKind::Down, own, 110.0, 110.0), &mut ctx);
        assert!(!control.is_following());
        assert!(!control.is_chasing());

        ctx.now = ms(100);
        control.tick(&mut ctx);
        assert_eq!(scene.object(id).unwrap().x(), 102);
    }
}
