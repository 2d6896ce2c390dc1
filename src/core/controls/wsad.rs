//=========================================================================
// WSAD Control
//=========================================================================
//
// Four-way keyboard movement. Holding a key repeats a 1px move in its
// direction until the key is released.
//
//=========================================================================

use std::any::Any;
use std::time::Duration;

use log::trace;

use super::{Control, ControlContext, Direction, Subscription};
use crate::core::input::event::{GameEvent, KeyCode, KeyboardEventKind};
use crate::core::object::ObjectId;
use crate::core::spam::Spam;

//=== Constants ===========================================================

/// Period of the 1px movement repeat.
pub const DEFAULT_MOVE_INTERVAL: Duration = Duration::from_millis(2);

//=== MovementKeys ========================================================

/// Key bound to each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementKeys {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl MovementKeys {
    pub const ARROWS: Self = Self {
        up: KeyCode::ArrowUp,
        down: KeyCode::ArrowDown,
        left: KeyCode::ArrowLeft,
        right: KeyCode::ArrowRight,
    };

    fn direction_of(&self, key: KeyCode) -> Option<Direction> {
        if key == self.up {
            Some(Direction::Up)
        } else if key == self.down {
            Some(Direction::Down)
        } else if key == self.left {
            Some(Direction::Left)
        } else if key == self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }

    fn all(&self) -> [KeyCode; 4] {
        [self.up, self.down, self.left, self.right]
    }
}

impl Default for MovementKeys {
    fn default() -> Self {
        Self {
            up: KeyCode::KeyW,
            down: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
        }
    }
}

//=== WsadControl =========================================================

#[derive(Debug)]
pub struct WsadControl {
    object: ObjectId,
    keys: MovementKeys,
    /// Indexed by `Direction::index`.
    spams: [Spam; 4],
}

impl WsadControl {
    pub fn new(object: ObjectId) -> Self {
        Self::with_keys(object, MovementKeys::default())
    }

    pub fn with_keys(object: ObjectId, keys: MovementKeys) -> Self {
        Self {
            object,
            keys,
            spams: std::array::from_fn(|_| Spam::new(DEFAULT_MOVE_INTERVAL)),
        }
    }

    pub fn keys(&self) -> MovementKeys {
        self.keys
    }

    /// Changes the repeat period of every direction.
    pub fn update_speed(&mut self, interval: Duration) {
        for spam in &mut self.spams {
            spam.update_interval(interval);
        }
    }

    pub fn speed(&self) -> Duration {
        self.spams[0].interval()
    }

    pub fn is_moving(&self, direction: Direction) -> bool {
        self.spams[direction.index()].is_running()
    }
}

impl Control for WsadControl {
    fn object(&self) -> ObjectId {
        self.object
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        let mut subs = Vec::with_capacity(8);
        for key in self.keys.all() {
            subs.push(Subscription::Keyboard { kind: KeyboardEventKind::Down, key });
            subs.push(Subscription::Keyboard { kind: KeyboardEventKind::Up, key });
        }
        subs
    }

    fn handle(&mut self, event: &GameEvent, ctx: &mut ControlContext<'_>) {
        let GameEvent::Keyboard { kind, key, .. } = event else {
            return;
        };
        let Some(direction) = self.keys.direction_of(*key) else {
            return;
        };

        let spam = &mut self.spams[direction.index()];
        match kind {
            KeyboardEventKind::Down => {
                if spam.start(ctx.now, None) {
                    trace!(target: "controls", "{} moving {:?}", self.object, direction);
                }
            }
            KeyboardEventKind::Up => spam.stop(),
        }
    }

    fn tick(&mut self, ctx: &mut ControlContext<'_>) {
        for direction in Direction::ALL {
            let fires = self.spams[direction.index()].poll(ctx.now);
            if fires == 0 {
                continue;
            }
            let Some(mut object) = ctx.object(self.object) else {
                return;
            };
            for _ in 0..fires {
                direction.step(&mut object, 1);
            }
        }
    }

    fn halt(&mut self, _ctx: &mut ControlContext<'_>) {
        for spam in &mut self.spams {
            spam.stop();
        }
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
    use crate::core::input::event::Modifiers;
    use crate::core::object::GameObject;
    use crate::core::scene::Scene;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn key(kind: KeyboardEventKind, key: KeyCode) -> GameEvent {
        GameEvent::Keyboard { kind, key, modifiers: Modifiers::NONE }
    }

    fn setup() -> (Scene, ObjectId, WsadControl) {
        let mut scene = Scene::new(Size::new(800, 600));
        let id = scene.add_object(GameObject::new(20, 20).at(100, 100));
        (scene, id, WsadControl::new(id))
    }

    #[test]
    fn held_key_moves_one_pixel_per_interval() {
        let (mut scene, id, mut control) = setup();
        let cid = ControlId::next();

        let mut ctx = ControlContext { scene: &mut scene, now: ms(0), id: cid };
        control.handle(&key(KeyboardEventKind::Down, KeyCode::KeyD), &mut ctx);
        assert!(control.is_moving(Direction::Right));

        let mut ctx = ControlContext { scene: &mut scene, now: ms(10), id: cid };
        control.tick(&mut ctx);
        assert_eq!(scene.object(id).unwrap().x(), 105);
    }

    #[test]
    fn release_stops_movement() {
        let (mut scene, id, mut control) = setup();
        let cid = ControlId::next();

        let mut ctx = ControlContext { scene: &mut scene, now: ms(0), id: cid };
        control.handle(&key(KeyboardEventKind::Down, KeyCode::KeyW), &mut ctx);
        ctx.now = ms(4);
        control.tick(&mut ctx);
        control.handle(&key(KeyboardEventKind::Up, KeyCode::KeyW), &mut ctx);
        ctx.now = ms(40);
        control.tick(&mut ctx);

        assert_eq!(scene.object(id).unwrap().y(), 98);
    }

    #[test]
    fn update_speed_changes_interval() {
        let (mut scene, id, mut control) = setup();
        control.update_speed(ms(5));
        assert_eq!(control.speed(), ms(5));

        let mut ctx = ControlContext { scene: &mut scene, now: ms(0), id: ControlId::next() };
        control.handle(&key(KeyboardEventKind::Down, KeyCode::KeyA), &mut ctx);
        ctx.now = ms(20);
        control.tick(&mut ctx);
        assert_eq!(scene.object(id).unwrap().x(), 96);
    }

    #[test]
    fn custom_keys_are_subscribed() {
        let control = WsadControl::with_keys(GameObject::new(1, 1).id(), MovementKeys::ARROWS);
        let subs = control.subscriptions();
        assert_eq!(subs.len(), 8);
        assert!(subs.contains(&Subscription::Keyboard {
            kind: KeyboardEventKind::Down,
            key: KeyCode::ArrowLeft,
        }));
    }
}
