//=========================================================================
// Engine Messages
//=========================================================================
//
// Notifications published on the scene's bus during a tick.
//
//=========================================================================

use crate::core::controls::{ControlId, CursorIcon, RunningStatus};
use crate::core::geometry::{Axis, Side};
use crate::core::object::ObjectId;

//=== ObjectEvent =========================================================

/// Something that happened to an object while the scene moved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectEvent {
    pub object: ObjectId,
    pub kind: ObjectEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectEventKind {
    /// The object moved `diff` pixels along `axis`.
    Moved { axis: Axis, diff: i32 },

    /// A move was blocked by `other` on the given side of the object.
    Collision { side: Side, other: ObjectId },

    /// A move was blocked by the closed stage border on `side`.
    LeftStage { side: Side },
}

//=== ControlStatus =======================================================

/// Running status change reported by an `AdControl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStatus {
    pub control: ControlId,
    pub object: ObjectId,
    pub status: RunningStatus,
}

//=== CursorRequest =======================================================

/// Pointer shape requested by a control for its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorRequest {
    pub object: ObjectId,
    pub icon: CursorIcon,
}
