//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use scrollstage_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::core::error::EngineError;
pub use crate::core::screen::{GameScreen, StandardControls};

// Scene model
pub use crate::core::camera::Camera;
pub use crate::core::geometry::{Axis, Bounds, Point, Side, Size};
pub use crate::core::object::{GameObject, ObjectId, ObjectMut, Platform, PlatformId};
pub use crate::core::scene::Scene;
pub use crate::core::spam::Spam;

// Rendering seams
pub use crate::core::surface::{Background, HeadlessScroller, HeadlessSurfaces, Scroller, SurfaceBackend};

// Input
pub use crate::core::input::{
    EventContext, GameEvent, InputEvent, KeyCode, KeyboardEventKind, ListenerId, Modifiers, MouseButton, MouseEventKind,
    MouseTarget,
};

// Controls
pub use crate::core::controls::{
    AdControl, Control, ControlId, CursorIcon, Direction, DragAndDropControl, FollowCursorOnClickControl,
    FollowCursorOnMoveControl, JumpYControl, MovementKeys, RunningStatus, WsadControl,
};

// Message bus
pub use crate::core::message_bus::{ControlStatus, CursorRequest, MessageBus, ObjectEvent, ObjectEventKind};
