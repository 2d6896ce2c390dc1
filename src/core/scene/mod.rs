//=========================================================================
// Scene
//=========================================================================
//
// Owner of the stage: objects, camera, platforms, gravity and the
// per-tick message bus. The only place where object coordinates change.
//
// Architecture:
// ```text
//   Scene
//     ├─ objects: Vec<GameObject>      (insertion order)
//     ├─ camera: Option<Camera>        (follows one object by id)
//     ├─ platforms: Vec<Platform>      (chunk runs along the floor)
//     ├─ gravity: Spam                 (drives ensure_gravity)
//     ├─ surfaces: Box<dyn SurfaceBackend>
//     └─ bus: MessageBus               (ObjectEvent, ControlStatus, ...)
// ```
//
// Move Flow:
// ```text
//   ObjectMut::right(px)
//         ↓
//   Scene::move_object(id, axis, target)
//         ├─► request_coordinate_update()   borders, then collisions
//         ├─► write position + surface
//         └─► camera follow → platform culling
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::camera::Camera;
use crate::core::error::EngineError;
use crate::core::geometry::{Axis, Point, Side, Size};
use crate::core::message_bus::{MessageBus, ObjectEvent, ObjectEventKind};
use crate::core::object::{GameObject, ObjectId, ObjectMut, Platform};
use crate::core::spam::Spam;
use crate::core::surface::{Background, HeadlessSurfaces, Rgba, SurfaceBackend, SurfaceHandle};

//=== Module Declarations =================================================

mod collision;
mod platforms;

//=== Constants ===========================================================

/// Period of the gravity task.
pub const DEFAULT_GRAVITY_INTERVAL: Duration = Duration::from_millis(3);

//=== SceneId =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene-{}", self.0)
    }
}

//=== Scene ===============================================================

/// Stage with objects, collision rules, gravity and an optional camera.
///
/// # Examples
///
/// ```
/// use scrollstage_engine::core::geometry::Size;
/// use scrollstage_engine::core::object::GameObject;
/// use scrollstage_engine::core::scene::Scene;
///
/// let mut scene = Scene::new(Size::new(800, 600));
/// let id = scene.add_object(GameObject::new(50, 50).at(100, 100));
///
/// let mut hero = scene.object_mut(id).unwrap();
/// assert!(hero.set_x(740));
/// assert!(!hero.set_x(751));
/// assert_eq!(hero.get().x(), 740);
/// ```
pub struct Scene {
    id: SceneId,
    objects: Vec<GameObject>,
    stage: Size,
    closed_borders: bool,
    camera: Option<Camera>,
    background: Option<Background>,
    background_color: Option<Rgba>,
    gravity: Spam,
    platforms: Vec<Platform>,
    surfaces: Box<dyn SurfaceBackend>,
    root: SurfaceHandle,
    bus: MessageBus,
}

impl Scene {
    //--- Construction -----------------------------------------------------

    /// Scene backed by [`HeadlessSurfaces`].
    pub fn new(stage: Size) -> Self {
        Self::with_backend(stage, Box::new(HeadlessSurfaces::new()))
    }

    pub fn with_backend(stage: Size, mut surfaces: Box<dyn SurfaceBackend>) -> Self {
        let root = surfaces.create_surface();
        surfaces.set_size(root, stage);

        let id = SceneId::next();
        info!(target: "scene", "Created {} ({}x{})", id, stage.width, stage.height);

        Self {
            id,
            objects: Vec::new(),
            stage,
            closed_borders: true,
            camera: None,
            background: None,
            background_color: None,
            gravity: Spam::new(DEFAULT_GRAVITY_INTERVAL),
            platforms: Vec::new(),
            surfaces,
            root,
            bus: MessageBus::new(),
        }
    }

    pub fn with_camera(mut self, mut camera: Camera) -> Self {
        camera.set_content_size(self.stage);
        self.camera = Some(camera);
        self
    }

    pub fn with_closed_borders(mut self, closed: bool) -> Self {
        self.closed_borders = closed;
        self
    }

    pub fn with_gravity_interval(mut self, interval: Duration) -> Self {
        self.gravity.update_interval(interval);
        self
    }

    //--- Stage ------------------------------------------------------------

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn stage(&self) -> Size {
        self.stage
    }

    /// Resizes the stage and the camera's scrollable range with it.
    pub fn set_stage_size(&mut self, stage: Size) {
        debug!(target: "scene", "{} stage resized to {}x{}", self.id, stage.width, stage.height);
        self.stage = stage;
        self.surfaces.set_size(self.root, stage);
        if let Some(camera) = &mut self.camera {
            camera.set_content_size(stage);
        }
    }

    pub fn set_stage_width(&mut self, width: i32) {
        self.set_stage_size(Size::new(width, self.stage.height));
    }

    pub fn set_stage_height(&mut self, height: i32) {
        self.set_stage_size(Size::new(self.stage.width, height));
    }

    pub fn closed_borders(&self) -> bool {
        self.closed_borders
    }

    pub fn set_closed_borders(&mut self, closed: bool) {
        self.closed_borders = closed;
    }

    //--- Background -------------------------------------------------------

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, background: Background) {
        self.surfaces.set_background(self.root, &background);
        self.background = Some(background);
    }

    pub fn background_color(&self) -> Option<Rgba> {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Rgba) {
        self.surfaces.set_background_color(self.root, color);
        self.background_color = Some(color);
    }

    //--- Surfaces ---------------------------------------------------------

    pub fn surfaces(&self) -> &dyn SurfaceBackend {
        self.surfaces.as_ref()
    }

    pub fn root_surface(&self) -> SurfaceHandle {
        self.root
    }

    //--- Messages ---------------------------------------------------------

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut MessageBus {
        &mut self.bus
    }

    //=====================================================================
    // Objects
    //=====================================================================

    /// Adds an object at its configured position.
    ///
    /// Insertion places the object without a collision check; every
    /// later move is checked.
    pub fn add_object(&mut self, mut object: GameObject) -> ObjectId {
        let handle = self.surfaces.create_surface();
        self.surfaces.mount(self.root, handle);

        object.scene = Some(self.id);
        object.surface = Some(handle);

        let id = object.id;
        debug!(
            target: "scene",
            "Added object {} to {} at ({}, {})",
            id, self.id, object.position.x, object.position.y
        );

        self.objects.push(object);
        self.sync_surface(self.objects.len() - 1);
        id
    }

    /// Removes an object, releasing its surface.
    ///
    /// Controls and listeners bound to the object live in `GameScreen`;
    /// remove through `GameScreen::remove_object` to drop them as well.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<GameObject> {
        let index = self.index_of(id)?;
        let mut object = self.objects.remove(index);

        if let Some(handle) = object.surface.take() {
            self.surfaces.destroy_surface(handle);
        }
        object.scene = None;

        if let Some(camera) = &mut self.camera {
            camera.release(id);
        }
        for platform in &mut self.platforms {
            platform.chunks.retain(|chunk| *chunk != id);
        }

        debug!(target: "scene", "Removed object {} from {}", id, self.id);
        Some(object)
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<ObjectMut<'_>> {
        let index = self.index_of(id)?;
        Some(ObjectMut::new(self, index))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Visible object under a stage point, highest z first, later
    /// insertions above earlier ones.
    pub fn topmost_object_at(&self, point: Point) -> Option<ObjectId> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.visible && o.bounds().contains(point))
            .max_by_key(|(index, o)| (o.z, *index))
            .map(|(_, o)| o.id)
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    //=====================================================================
    // Coordinate Authority
    //=====================================================================

    /// Decides whether `actor` may move to `target` along `axis`.
    ///
    /// Checks, in order: closed stage borders, then colliding objects on
    /// the same z. A refusal publishes an [`ObjectEvent`] naming the
    /// side that was hit. A request that does not change the coordinate
    /// is always accepted. Unknown actors are refused.
    pub fn request_coordinate_update(&mut self, actor: ObjectId, axis: Axis, target: i32) -> bool {
        let Some(index) = self.index_of(actor) else {
            debug!(target: "scene", "Move request for unknown object {}", actor);
            return false;
        };
        let object = &self.objects[index];

        if object.position.get(axis) == target {
            return true;
        }

        if self.closed_borders {
            if let Some(side) = collision::border_violation(self.stage, object, axis, target) {
                trace!(target: "scene", "Object {} stopped by {:?} border", actor, side);
                self.bus.push(ObjectEvent {
                    object: actor,
                    kind: ObjectEventKind::LeftStage { side },
                });
                return false;
            }
        }

        if !object.collides() {
            return true;
        }

        if let Some(other) = collision::find_blocker(&self.objects, object, axis, target) {
            let positive = target > object.position.get(axis);
            let side = Side::of_move(axis, positive);
            let other = other.id;
            trace!(target: "scene", "Object {} blocked by {} on {:?}", actor, other, side);
            self.bus.push(ObjectEvent {
                object: actor,
                kind: ObjectEventKind::Collision { side, other },
            });
            return false;
        }

        true
    }

    /// Authorized write: asks, moves, mirrors, lets the camera follow.
    pub(crate) fn move_object(&mut self, id: ObjectId, axis: Axis, target: i32) -> bool {
        if !self.request_coordinate_update(id, axis, target) {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };

        let object = &mut self.objects[index];
        let diff = target - object.position.get(axis);
        if diff == 0 {
            return true;
        }

        object.position.set(axis, target);
        if let Some(handle) = object.surface {
            self.surfaces.set_position(handle, object.position);
        }

        self.bus.push(ObjectEvent {
            object: id,
            kind: ObjectEventKind::Moved { axis, diff },
        });

        self.follow_with_camera(index, axis, diff);
        true
    }

    /// Moves the camera after its attached object moved by `diff`.
    ///
    /// Moving away from the view centre drags the camera along; moving
    /// back toward it does not until the object crosses the centre.
    fn follow_with_camera(&mut self, index: usize, axis: Axis, diff: i32) {
        let Some(camera) = &mut self.camera else {
            return;
        };
        let object = &self.objects[index];
        if camera.attached() != Some(object.id) {
            return;
        }

        let (before, after) = match axis {
            Axis::X => (camera.is_before_x_center(object), camera.is_after_x_center(object)),
            Axis::Y => (camera.is_before_y_center(object), camera.is_after_y_center(object)),
        };
        if (diff > 0 && before) || (diff < 0 && after) {
            return;
        }

        let moved = match axis {
            Axis::X => camera.move_x(diff),
            Axis::Y => camera.move_y(diff),
        };
        if moved {
            self.cull_platforms();
        }
    }

    /// Applies a non-positional change and mirrors the object's surface.
    pub(crate) fn modify_object(&mut self, index: usize, change: impl FnOnce(&mut GameObject)) {
        change(&mut self.objects[index]);
        self.sync_surface(index);
    }

    fn sync_surface(&mut self, index: usize) {
        let object = &self.objects[index];
        let Some(handle) = object.surface else {
            return;
        };
        self.surfaces.set_position(handle, object.position);
        self.surfaces.set_size(handle, object.size);
        self.surfaces.set_stacking(handle, object.z);
        self.surfaces.set_visible(handle, object.visible);
        if let Some(background) = &object.background {
            self.surfaces.set_background(handle, background);
        }
    }

    //=====================================================================
    // Gravity & Support
    //=====================================================================

    /// One gravity tick.
    ///
    /// Every gravity object falls its intensity in single-pixel steps and
    /// stops at the first refused step, so it comes to rest flush on
    /// whatever holds it.
    pub fn ensure_gravity(&mut self) {
        for index in 0..self.objects.len() {
            let object = &self.objects[index];
            if !object.gravity {
                continue;
            }
            let id = object.id;
            for _ in 0..object.gravity_intensity {
                let Some(y) = self.object(id).map(GameObject::y) else {
                    break;
                };
                if !self.move_object(id, Axis::Y, y + 1) {
                    break;
                }
            }
        }
    }

    /// Colliding object on the actor's z directly beneath it, at most
    /// `range` pixels below its bottom edge.
    pub fn find_object_below_within_range(&self, actor: ObjectId, range: i32) -> Option<ObjectId> {
        let object = self.object(actor)?;
        collision::find_support(&self.objects, object, range).map(|o| o.id)
    }

    /// Grounded check: true when something stands right under the actor.
    pub fn request_jump(&self, actor: ObjectId) -> bool {
        self.find_object_below_within_range(actor, 0).is_some()
    }

    pub fn gravity_interval(&self) -> Duration {
        self.gravity.interval()
    }

    pub fn set_gravity_interval(&mut self, interval: Duration) {
        self.gravity.update_interval(interval);
    }

    pub fn is_gravity_running(&self) -> bool {
        self.gravity.is_running()
    }

    /// Starts the gravity task at virtual time `now`.
    pub fn start_gravity(&mut self, now: Duration) {
        if self.gravity.start(now, None) {
            debug!(target: "scene", "{} gravity started", self.id);
        }
    }

    pub fn stop_gravity(&mut self) {
        self.gravity.stop();
    }

    /// Runs every gravity tick due up to `now`.
    pub fn advance(&mut self, now: Duration) {
        for _ in 0..self.gravity.poll(now) {
            self.ensure_gravity();
        }
    }

    //=====================================================================
    // Camera
    //=====================================================================

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn set_camera(&mut self, mut camera: Camera) {
        camera.set_content_size(self.stage);
        self.camera = Some(camera);
        self.cull_platforms();
    }

    /// Runs `f` on the camera, then re-culls platforms if it moved.
    pub fn update_camera<R>(&mut self, f: impl FnOnce(&mut Camera) -> R) -> Option<R> {
        let camera = self.camera.as_mut()?;
        let before = camera.offset();
        let result = f(camera);
        if camera.offset() != before {
            self.cull_platforms();
        }
        Some(result)
    }

    /// Follows `target` (or nothing), recentring on it at once.
    pub fn attach_camera(&mut self, target: Option<ObjectId>) -> Result<(), EngineError> {
        let object = match target {
            Some(id) => Some(
                self.objects
                    .iter()
                    .find(|o| o.id == id)
                    .ok_or(EngineError::UnknownObject(id))?,
            ),
            None => None,
        };
        let camera = self.camera.as_mut().ok_or(EngineError::NoCamera)?;
        camera.attach(object);
        debug!(target: "camera", "Camera of {} attached to {:?}", self.id, target);
        self.cull_platforms();
        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if self.update_camera(|camera| camera.set_viewport(viewport)).is_some() {
            self.cull_platforms();
        }
    }

    pub fn is_object_in_view(&self, id: ObjectId, pad_x: i32, pad_y: i32) -> Result<bool, EngineError> {
        let camera = self.camera.as_ref().ok_or(EngineError::NoCamera)?;
        let object = self.object(id).ok_or(EngineError::UnknownObject(id))?;
        Ok(camera.is_object_in_view(object, pad_x, pad_y))
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("stage", &self.stage)
            .field("objects", &self.objects.len())
            .field("closed_borders", &self.closed_borders)
            .field("camera", &self.camera)
            .field("platforms", &self.platforms.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
