//=========================================================================
// Camera
//=========================================================================
//
// Viewport offset over the stage, optionally following one object.
//
// Architecture:
// ```text
//   Scene::move_object ──(attached object moved)──► Camera::move_x/y
//                                                        │
//                                                        ▼
//                                               Scroller::scroll_to
// ```
//
// The camera only stores the id of the object it follows. The scene
// decides when the camera moves; the camera decides whether an offset
// is inside the scrollable range.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Point, Size};
use crate::core::object::{GameObject, ObjectId};
use crate::core::surface::{HeadlessScroller, Scroller};

//=== Constants ===========================================================

/// Padding used by [`Camera::is_object_in_view`] callers that have no
/// better value.
pub const DEFAULT_VIEW_PADDING: i32 = 128;

//=== Camera ==============================================================

pub struct Camera {
    offset: Point,
    viewport: Size,
    attached: Option<ObjectId>,
    scroller: Box<dyn Scroller>,
}

impl Camera {
    /// Camera backed by a [`HeadlessScroller`].
    pub fn new(viewport: Size) -> Self {
        Self::with_scroller(viewport, Box::new(HeadlessScroller::new()))
    }

    pub fn with_scroller(viewport: Size, scroller: Box<dyn Scroller>) -> Self {
        Self {
            offset: Point::ORIGIN,
            viewport,
            attached: None,
            scroller,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn x(&self) -> i32 {
        self.offset.x
    }

    pub fn y(&self) -> i32 {
        self.offset.y
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Object the camera follows.
    pub fn attached(&self) -> Option<ObjectId> {
        self.attached
    }

    pub fn scrollable_size(&self) -> Size {
        self.scroller.scrollable_size()
    }

    //--- Offset -----------------------------------------------------------

    /// Moves the view horizontally.
    ///
    /// Ignored (returns `false`) when `x` is negative or not below the
    /// scrollable width.
    pub fn set_x(&mut self, x: i32) -> bool {
        if x < 0 || x >= self.scroller.scrollable_size().width {
            trace!(target: "camera", "Ignoring camera x {}", x);
            return false;
        }
        self.offset.x = x;
        self.scroller.scroll_to(self.offset);
        true
    }

    /// Vertical counterpart of [`Camera::set_x`].
    pub fn set_y(&mut self, y: i32) -> bool {
        if y < 0 || y >= self.scroller.scrollable_size().height {
            trace!(target: "camera", "Ignoring camera y {}", y);
            return false;
        }
        self.offset.y = y;
        self.scroller.scroll_to(self.offset);
        true
    }

    /// Returns `true` if either axis moved.
    pub fn set_xy(&mut self, x: i32, y: i32) -> bool {
        let moved_x = self.set_x(x);
        let moved_y = self.set_y(y);
        moved_x || moved_y
    }

    pub fn move_x(&mut self, diff: i32) -> bool {
        self.set_x(self.offset.x.saturating_add(diff))
    }

    pub fn move_y(&mut self, diff: i32) -> bool {
        self.set_y(self.offset.y.saturating_add(diff))
    }

    pub fn right(&mut self, px: i32) -> bool {
        self.move_x(px)
    }

    pub fn left(&mut self, px: i32) -> bool {
        self.move_x(px.saturating_neg())
    }

    pub fn up(&mut self, px: i32) -> bool {
        self.move_y(px.saturating_neg())
    }

    pub fn down(&mut self, px: i32) -> bool {
        self.move_y(px)
    }

    //--- Centre Tests -----------------------------------------------------
    //
    // "object centre - offset" against "viewport / 2", doubled on both
    // sides so odd sizes compare exactly.
    //

    pub fn is_before_x_center(&self, object: &GameObject) -> bool {
        2 * (object.x() - self.offset.x) + object.width() < self.viewport.width
    }

    pub fn is_after_x_center(&self, object: &GameObject) -> bool {
        2 * (object.x() - self.offset.x) + object.width() > self.viewport.width
    }

    pub fn is_before_y_center(&self, object: &GameObject) -> bool {
        2 * (object.y() - self.offset.y) + object.height() < self.viewport.height
    }

    pub fn is_after_y_center(&self, object: &GameObject) -> bool {
        2 * (object.y() - self.offset.y) + object.height() > self.viewport.height
    }

    //--- Visibility -------------------------------------------------------

    /// True when the object grown by the padding touches the view.
    ///
    /// Edges count as touching, except the view's bottom edge.
    pub fn is_object_in_view(&self, object: &GameObject, pad_x: i32, pad_y: i32) -> bool {
        let view_right = self.offset.x + self.viewport.width;
        let view_bottom = self.offset.y + self.viewport.height;

        object.x() + object.width() + pad_x >= self.offset.x
            && object.x() - pad_x <= view_right
            && object.y() + object.height() + pad_y >= self.offset.y
            && object.y() - pad_y < view_bottom
    }

    //--- Scene Hooks ------------------------------------------------------

    pub(crate) fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub(crate) fn set_content_size(&mut self, size: Size) {
        self.scroller.set_content_size(size);
    }

    /// Follows `object`, centring the view on it as far as the range
    /// allows.
    pub(crate) fn attach(&mut self, object: Option<&GameObject>) {
        self.attached = object.map(GameObject::id);

        let Some(object) = object else {
            return;
        };

        let scrollable = self.scroller.scrollable_size();
        let x = object.x() + object.width() / 2 - self.viewport.width / 2;
        let y = object.y() + object.height() / 2 - self.viewport.height / 2;

        self.set_x(x.clamp(0, (scrollable.width - 1).max(0)));
        self.set_y(y.clamp(0, (scrollable.height - 1).max(0)));
    }

    /// Forgets the followed object if it is `id`.
    pub(crate) fn release(&mut self, id: ObjectId) {
        if self.attached == Some(id) {
            self.attached = None;
        }
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("offset", &self.offset)
            .field("viewport", &self.viewport)
            .field("attached", &self.attached)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
