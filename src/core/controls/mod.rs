//=========================================================================
// Controls
//=========================================================================
//
// Reusable input behaviours bound to one game object.
//
// Architecture:
// ```text
//   GameScreen
//     └─ ControlSlot { control, object, listeners, active }
//          │
//          ├─ subscriptions() → one listener per entry (registered inactive)
//          ├─ handle(event)   ← events of its active listeners
//          ├─ tick()          ← every advance while active (spams fire here)
//          └─ halt()          ← on deactivation / detach
// ```
//
// A control never touches the screen's registries. The screen owns the
// listener records and flips them together with the control's `active`
// flag, so deactivation pauses a control without unregistering it.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::input::event::{GameEvent, KeyCode, KeyboardEventKind, MouseEventKind, MouseTarget};
use crate::core::input::listener::ListenerId;
use crate::core::object::{ObjectId, ObjectMut};
use crate::core::scene::Scene;

//=== Module Declarations =================================================

mod ad;
mod drag_drop;
mod follow_cursor;
mod jump;
mod wsad;

//=== Public API ==========================================================

pub use ad::{AdControl, RunningStatus, StatusCallback, DEFAULT_RUN_INTERVAL};
pub use drag_drop::{CursorIcon, DragAndDropControl};
pub use follow_cursor::{
    FollowCursorOnClickControl, FollowCursorOnMoveControl, DEFAULT_RADIUS_THRESHOLD, DEFAULT_SMOOTHNESS,
};
pub use jump::{JumpYControl, DEFAULT_JUMP_DURATION, DEFAULT_JUMP_INTERVAL, DEFAULT_VERTICAL_STEP};
pub use wsad::{MovementKeys, WsadControl, DEFAULT_MOVE_INTERVAL};

//=== ControlId ===========================================================

/// Handle of an attached control, unique for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u64);

impl ControlId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

//=== Subscription ========================================================

/// One event a control wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Keyboard { kind: KeyboardEventKind, key: KeyCode },
    Mouse { kind: MouseEventKind, target: MouseTarget },
}

//=== ControlContext ======================================================

/// What a control can reach while handling an event or ticking.
pub struct ControlContext<'a> {
    pub scene: &'a mut Scene,
    /// Virtual time of the screen.
    pub now: Duration,
    /// Id the control was attached under.
    pub id: ControlId,
}

impl ControlContext<'_> {
    /// Mutable handle to `object`, `None` once it left the scene.
    pub fn object(&mut self, object: ObjectId) -> Option<ObjectMut<'_>> {
        self.scene.object_mut(object)
    }
}

//=== Control =============================================================

/// Behaviour driven by input events and the screen clock.
pub trait Control: Send + 'static {
    /// Object the control moves.
    fn object(&self) -> ObjectId;

    /// Events the control listens to. Read once, at attach time.
    fn subscriptions(&self) -> Vec<Subscription>;

    fn handle(&mut self, event: &GameEvent, ctx: &mut ControlContext<'_>);

    /// Runs the control's repeating work due up to `ctx.now`.
    fn tick(&mut self, _ctx: &mut ControlContext<'_>) {}

    /// Stops everything in flight. Called on deactivation and detach.
    fn halt(&mut self, _ctx: &mut ControlContext<'_>) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== ControlSlot =========================================================

/// A control as stored by the screen.
pub(crate) struct ControlSlot {
    pub(crate) control: Box<dyn Control>,
    pub(crate) object: ObjectId,
    pub(crate) listeners: Vec<ListenerId>,
    pub(crate) active: bool,
}

impl std::fmt::Debug for ControlSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSlot")
            .field("object", &self.object)
            .field("listeners", &self.listeners.len())
            .field("active", &self.active)
            .finish()
    }
}

//=== Direction ===========================================================

/// Screen direction of a one-axis move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    /// Moves `object` by `px` in this direction through the scene.
    pub fn step(self, object: &mut ObjectMut<'_>, px: i32) -> bool {
        match self {
            Self::Up => object.up(px),
            Self::Down => object.down(px),
            Self::Left => object.left(px),
            Self::Right => object.right(px),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Size;
    use crate::core::object::GameObject;

    #[test]
    fn control_ids_are_ordered_by_creation() {
        let a = ControlId::next();
        let b = ControlId::next();
        assert!(a < b);
    }

    #[test]
    fn direction_steps_through_scene() {
        let mut scene = Scene::new(Size::new(100, 100));
        let id = scene.add_object(GameObject::new(10, 10).at(50, 50));
        let mut object = scene.object_mut(id).unwrap();

        assert!(Direction::Right.step(&mut object, 5));
        assert!(Direction::Up.step(&mut object, 10));
        assert_eq!((object.get().x(), object.get().y()), (55, 40));
    }

    #[test]
    fn direction_indices_are_distinct() {
        let mut seen: Vec<usize> = Direction::ALL.iter().map(|d| d.index()).collect();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
