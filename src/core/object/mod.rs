//=========================================================================
// Game Objects
//=========================================================================
//
// Rectangular actors placed on a scene's stage.
//
// Ownership:
// ```text
//   Scene ──owns──► Vec<GameObject> ──owns──► SurfaceHandle
//     ▲                   │
//     └── scene id ───────┘   (plain id, no back-pointer)
// ```
//
// A `GameObject` is configured with builder methods and handed to
// `Scene::add_object`. From then on its coordinates change only through
// the scene (see `ObjectMut`), which checks borders and collisions first.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Bounds, Point, Size};
use crate::core::scene::SceneId;
use crate::core::surface::{Background, SurfaceHandle};

//=== Module Declarations =================================================

mod handle;
mod platform;

pub use handle::ObjectMut;
pub use platform::{Platform, PlatformId, DEFAULT_VISIBILITY_PADDING};

//=== ObjectId ============================================================

/// Process-unique object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== GameObject ==========================================================

/// Default pixels per gravity tick.
pub const DEFAULT_GRAVITY_INTENSITY: u32 = 1;

/// A rectangle on the stage with collision and gravity settings.
///
/// # Defaults
///
/// Position `(0, 0)`, `z = 0`, collision and gravity off, gravity
/// intensity 1, visible.
///
/// # Examples
///
/// ```
/// use scrollstage_engine::core::object::GameObject;
///
/// let hero = GameObject::new(32, 48)
///     .at(100, 100)
///     .with_collision(true)
///     .with_gravity(true);
///
/// assert_eq!(hero.bounds().bottom, 148);
/// ```
#[derive(Debug, Clone)]
pub struct GameObject {
    pub(crate) id: ObjectId,
    pub(crate) position: Point,
    pub(crate) z: i32,
    pub(crate) size: Size,
    pub(crate) collision: bool,
    pub(crate) gravity: bool,
    pub(crate) gravity_intensity: u32,
    pub(crate) visible: bool,
    pub(crate) background: Option<Background>,
    pub(crate) scene: Option<SceneId>,
    pub(crate) surface: Option<SurfaceHandle>,
}

impl GameObject {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            id: ObjectId::next(),
            position: Point::ORIGIN,
            z: 0,
            size: Size::new(width, height),
            collision: false,
            gravity: false,
            gravity_intensity: DEFAULT_GRAVITY_INTENSITY,
            visible: true,
            background: None,
            scene: None,
            surface: None,
        }
    }

    //--- Builder ----------------------------------------------------------

    /// Initial position, applied when the object is added to a scene.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_collision(mut self, collision: bool) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_gravity_intensity(mut self, intensity: u32) -> Self {
        self.gravity_intensity = intensity;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.position, self.size)
    }

    /// Centre in stage coordinates, half pixels kept.
    pub fn center(&self) -> (f32, f32) {
        (
            self.position.x as f32 + self.size.width as f32 / 2.0,
            self.position.y as f32 + self.size.height as f32 / 2.0,
        )
    }

    pub fn has_collision(&self) -> bool {
        self.collision
    }

    pub fn has_gravity(&self) -> bool {
        self.gravity
    }

    pub fn gravity_intensity(&self) -> u32 {
        self.gravity_intensity
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Scene the object was added to, `None` before insertion.
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.surface
    }

    /// True when the object takes part in collision checks.
    pub(crate) fn collides(&self) -> bool {
        self.collision && self.size.is_positive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
