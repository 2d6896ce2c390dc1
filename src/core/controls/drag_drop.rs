//=========================================================================
// Drag And Drop Control
//=========================================================================
//
// Press on the object to pick it up, move the mouse anywhere to drag it,
// release anywhere to drop it.
//
// Event Flow:
// ```text
//   Down(object) ─► dragging
//   Move(scene)  ─► remember cursor, reposition on next tick
//   Up(scene)    ─► dropped
//   Enter/Leave(object) ─► pointer affordance
// ```
//
// The reposition is deferred to the next tick and goes through the
// scene's authorized moves, so a dragged object still cannot be pushed
// through walls or off a closed stage.
//
//=========================================================================

use std::any::Any;

use log::trace;

use super::{Control, ControlContext, Subscription};
use crate::core::input::event::{GameEvent, MouseEventKind, MouseTarget};
use crate::core::message_bus::CursorRequest;
use crate::core::object::ObjectId;

//=== CursorIcon ==========================================================

/// Pointer shape a control asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Grab,
    Grabbing,
}

//=== DragAndDropControl ==================================================

#[derive(Debug)]
pub struct DragAndDropControl {
    object: ObjectId,
    hovering: bool,
    dragging: bool,
    /// Last cursor position in stage coordinates.
    cursor: Option<(f32, f32)>,
    pending: bool,
    icon: CursorIcon,
}

impl DragAndDropControl {
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            hovering: false,
            dragging: false,
            cursor: None,
            pending: false,
            icon: CursorIcon::Default,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer shape currently requested for the object.
    pub fn cursor(&self) -> CursorIcon {
        self.icon
    }

    fn set_icon(&mut self, icon: CursorIcon, ctx: &mut ControlContext<'_>) {
        if self.icon == icon {
            return;
        }
        self.icon = icon;
        ctx.scene.bus_mut().push(CursorRequest {
            object: self.object,
            icon,
        });
    }

    fn resting_icon(&self) -> CursorIcon {
        if self.hovering {
            CursorIcon::Grab
        } else {
            CursorIcon::Default
        }
    }
}

impl Control for DragAndDropControl {
    fn object(&self) -> ObjectId {
        self.object
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        let own = MouseTarget::Object(self.object);
        vec![
            Subscription::Mouse { kind: MouseEventKind::Enter, target: own },
            Subscription::Mouse { kind: MouseEventKind::Leave, target: own },
            Subscription::Mouse { kind: MouseEventKind::Down, target: own },
            Subscription::Mouse { kind: MouseEventKind::Up, target: MouseTarget::Scene },
            Subscription::Mouse { kind: MouseEventKind::Move, target: MouseTarget::Scene },
        ]
    }

    fn handle(&mut self, event: &GameEvent, ctx: &mut ControlContext<'_>) {
        let Some((kind, target, payload)) = event.mouse() else {
            return;
        };

        match (kind, target) {
            (MouseEventKind::Enter, MouseTarget::Object(_)) => {
                self.hovering = true;
                if !self.dragging {
                    self.set_icon(CursorIcon::Grab, ctx);
                }
            }
            (MouseEventKind::Leave, MouseTarget::Object(_)) => {
                self.hovering = false;
                if !self.dragging {
                    self.set_icon(CursorIcon::Default, ctx);
                }
            }
            (MouseEventKind::Down, MouseTarget::Object(_)) => {
                self.dragging = true;
                self.cursor = Some((payload.stage_x, payload.stage_y));
                self.set_icon(CursorIcon::Grabbing, ctx);
                trace!(target: "controls", "{} picked up", self.object);
            }
            (MouseEventKind::Move, MouseTarget::Scene) => {
                self.cursor = Some((payload.stage_x, payload.stage_y));
                if self.dragging {
                    self.pending = true;
                }
            }
            (MouseEventKind::Up, MouseTarget::Scene) => {
                if self.dragging {
                    trace!(target: "controls", "{} dropped", self.object);
                }
                self.dragging = false;
                self.pending = false;
                let icon = self.resting_icon();
                self.set_icon(icon, ctx);
            }
            _ => {}
        }
    }

    fn tick(&mut self, ctx: &mut ControlContext<'_>) {
        if !self.pending {
            return;
        }
        self.pending = false;

        let Some((cursor_x, cursor_y)) = self.cursor else {
            return;
        };
        let Some(mut object) = ctx.object(self.object) else {
            return;
        };

        let (width, height) = (object.get().width(), object.get().height());
        let x = (cursor_x - width as f32 / 2.0).round() as i32;
        let y = (cursor_y - height as f32 / 2.0).round() as i32;
        object.set_xy(x, y);
    }

    fn halt(&mut self, ctx: &mut ControlContext<'_>) {
        self.dragging = false;
        self.pending = false;
        self.hovering = false;
        self.set_icon(CursorIcon::Default, ctx);
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
