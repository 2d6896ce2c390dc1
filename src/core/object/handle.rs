//=========================================================================
// Object Handle
//=========================================================================
//
// Mutable view of one object inside its scene.
//
// Every coordinate change goes through `Scene::move_object`, which asks
// `request_coordinate_update` first and only then writes the position,
// mirrors it to the surface and lets the camera follow. Non-positional
// settings are written directly and mirrored to the surface.
//
//=========================================================================

use crate::core::geometry::{Axis, Size};
use crate::core::object::{GameObject, ObjectId};
use crate::core::scene::Scene;
use crate::core::surface::Background;

//=== ObjectMut ===========================================================

/// Mutable handle returned by [`Scene::object_mut`].
///
/// Move primitives return whether the scene accepted the move. A
/// rejected move leaves the object exactly where it was.
pub struct ObjectMut<'a> {
    scene: &'a mut Scene,
    index: usize,
}

impl<'a> ObjectMut<'a> {
    pub(crate) fn new(scene: &'a mut Scene, index: usize) -> Self {
        Self { scene, index }
    }

    pub fn get(&self) -> &GameObject {
        &self.scene.objects()[self.index]
    }

    pub fn id(&self) -> ObjectId {
        self.get().id
    }

    //--- Authorized Moves -------------------------------------------------

    pub fn set_x(&mut self, x: i32) -> bool {
        let id = self.id();
        self.scene.move_object(id, Axis::X, x)
    }

    pub fn set_y(&mut self, y: i32) -> bool {
        let id = self.id();
        self.scene.move_object(id, Axis::Y, y)
    }

    /// Two independent single-axis moves, X first.
    ///
    /// Returns `true` only when both were accepted; a blocked axis does
    /// not stop the other one (sliding along walls and floors).
    pub fn set_xy(&mut self, x: i32, y: i32) -> bool {
        let moved_x = self.set_x(x);
        let moved_y = self.set_y(y);
        moved_x && moved_y
    }

    pub fn set_xyz(&mut self, x: i32, y: i32, z: i32) -> bool {
        let moved = self.set_xy(x, y);
        self.set_z(z);
        moved
    }

    pub fn right(&mut self, px: i32) -> bool {
        let x = self.get().x();
        self.set_x(x.saturating_add(px))
    }

    pub fn left(&mut self, px: i32) -> bool {
        let x = self.get().x();
        self.set_x(x.saturating_sub(px))
    }

    pub fn up(&mut self, px: i32) -> bool {
        let y = self.get().y();
        self.set_y(y.saturating_sub(px))
    }

    pub fn down(&mut self, px: i32) -> bool {
        let y = self.get().y();
        self.set_y(y.saturating_add(px))
    }

    /// True when the object stands on a colliding object.
    pub fn request_jump(&self) -> bool {
        self.scene.request_jump(self.id())
    }

    //--- Stacking ---------------------------------------------------------

    pub fn set_z(&mut self, z: i32) {
        self.scene.modify_object(self.index, |obj| obj.z = z);
    }

    pub fn forward(&mut self) {
        self.scene.modify_object(self.index, |obj| obj.z += 1);
    }

    pub fn backward(&mut self) {
        self.scene.modify_object(self.index, |obj| obj.z -= 1);
    }

    //--- Physics Flags ----------------------------------------------------

    pub fn set_collision(&mut self, collision: bool) {
        self.scene.modify_object(self.index, |obj| obj.collision = collision);
    }

    pub fn set_gravity(&mut self, gravity: bool) {
        self.scene.modify_object(self.index, |obj| obj.gravity = gravity);
    }

    pub fn set_gravity_intensity(&mut self, intensity: u32) {
        self.scene
            .modify_object(self.index, |obj| obj.gravity_intensity = intensity);
    }

    //--- Appearance -------------------------------------------------------

    /// Resizes the object. Size changes are not collision checked.
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.scene
            .modify_object(self.index, |obj| obj.size = Size::new(width, height));
    }

    pub fn set_width(&mut self, width: i32) {
        self.scene.modify_object(self.index, |obj| obj.size.width = width);
    }

    pub fn set_height(&mut self, height: i32) {
        self.scene.modify_object(self.index, |obj| obj.size.height = height);
    }

    pub fn show(&mut self) {
        self.scene.modify_object(self.index, |obj| obj.visible = true);
    }

    pub fn hide(&mut self) {
        self.scene.modify_object(self.index, |obj| obj.visible = false);
    }

    pub fn set_background(&mut self, background: Background) {
        self.scene
            .modify_object(self.index, |obj| obj.background = Some(background));
    }
}
