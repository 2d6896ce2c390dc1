//=========================================================================
// Visual Surface & Scroller
//=========================================================================
//
// Contracts for the two output collaborators of the engine.
//
// Architecture:
// ```text
//   Scene ──► SurfaceBackend   (one surface per object + scene root)
//   Camera ─► Scroller         (viewport offset within the stage)
// ```
//
// The engine never draws. It only mirrors object state onto opaque
// surfaces so a renderer can pick it up. `HeadlessSurfaces` and
// `HeadlessScroller` keep that state in memory and back every scene that
// is not given a real backend.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Bounds, Point, Size};

//=== SurfaceHandle =======================================================

/// Opaque handle to a surface created by a [`SurfaceBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

//=== Background ==========================================================

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// What fills a background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundSource {
    Color(Rgba),
    /// Image reference handed to the renderer untouched.
    Image(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundRepeat {
    #[default]
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundSize {
    Auto,
    Cover,
    #[default]
    Contain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundAttachment {
    /// Stays put while the camera scrolls (parallax-free sky).
    #[default]
    Fixed,
    /// Scrolls with the stage.
    Scroll,
}

/// Background of a surface.
///
/// Defaults: repeat, contain, fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    pub source: BackgroundSource,
    pub repeat: BackgroundRepeat,
    pub size: BackgroundSize,
    pub attachment: BackgroundAttachment,
}

impl Background {
    pub fn color(color: Rgba) -> Self {
        Self::from_source(BackgroundSource::Color(color))
    }

    pub fn image(reference: impl Into<String>) -> Self {
        Self::from_source(BackgroundSource::Image(reference.into()))
    }

    fn from_source(source: BackgroundSource) -> Self {
        Self {
            source,
            repeat: BackgroundRepeat::default(),
            size: BackgroundSize::default(),
            attachment: BackgroundAttachment::default(),
        }
    }

    pub fn with_repeat(mut self, repeat: BackgroundRepeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_size(mut self, size: BackgroundSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_attachment(mut self, attachment: BackgroundAttachment) -> Self {
        self.attachment = attachment;
        self
    }
}

//=== SurfaceBackend ======================================================

/// Visual surface collaborator.
///
/// One surface per game object plus one root surface per scene. The
/// scene keeps every surface in sync with object state; implementors
/// only store or draw what they are told.
pub trait SurfaceBackend: Send {
    fn create_surface(&mut self) -> SurfaceHandle;
    fn destroy_surface(&mut self, handle: SurfaceHandle);
    fn set_position(&mut self, handle: SurfaceHandle, position: Point);
    fn set_size(&mut self, handle: SurfaceHandle, size: Size);
    fn size(&self, handle: SurfaceHandle) -> Size;
    fn set_stacking(&mut self, handle: SurfaceHandle, z: i32);
    fn set_visible(&mut self, handle: SurfaceHandle, visible: bool);
    fn set_background(&mut self, handle: SurfaceHandle, background: &Background);
    /// Solid color painted under the background.
    fn set_background_color(&mut self, handle: SurfaceHandle, color: Rgba);
    fn mount(&mut self, parent: SurfaceHandle, child: SurfaceHandle);
    fn bounding_box(&self, handle: SurfaceHandle) -> Bounds;
}

//=== HeadlessSurfaces ====================================================

/// State mirrored onto one headless surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceState {
    pub position: Point,
    pub size: Size,
    pub z: i32,
    pub visible: bool,
    pub background: Option<Background>,
    pub background_color: Option<Rgba>,
    pub parent: Option<SurfaceHandle>,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            size: Size::ZERO,
            z: 0,
            visible: true,
            background: None,
            background_color: None,
            parent: None,
        }
    }
}

/// In-memory [`SurfaceBackend`].
#[derive(Debug, Default)]
pub struct HeadlessSurfaces {
    next: u64,
    surfaces: HashMap<SurfaceHandle, SurfaceState>,
}

impl HeadlessSurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, handle: SurfaceHandle) -> Option<&SurfaceState> {
        self.surfaces.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    fn with_state(&mut self, handle: SurfaceHandle, f: impl FnOnce(&mut SurfaceState)) {
        match self.surfaces.get_mut(&handle) {
            Some(state) => f(state),
            None => trace!(target: "surface", "Ignoring update of unknown surface {:?}", handle),
        }
    }
}

impl SurfaceBackend for HeadlessSurfaces {
    fn create_surface(&mut self) -> SurfaceHandle {
        self.next += 1;
        let handle = SurfaceHandle(self.next);
        self.surfaces.insert(handle, SurfaceState::default());
        handle
    }

    fn destroy_surface(&mut self, handle: SurfaceHandle) {
        self.surfaces.remove(&handle);
    }

    fn set_position(&mut self, handle: SurfaceHandle, position: Point) {
        self.with_state(handle, |s| s.position = position);
    }

    fn set_size(&mut self, handle: SurfaceHandle, size: Size) {
        self.with_state(handle, |s| s.size = size);
    }

    fn size(&self, handle: SurfaceHandle) -> Size {
        self.surfaces.get(&handle).map_or(Size::ZERO, |s| s.size)
    }

    fn set_stacking(&mut self, handle: SurfaceHandle, z: i32) {
        self.with_state(handle, |s| s.z = z);
    }

    fn set_visible(&mut self, handle: SurfaceHandle, visible: bool) {
        self.with_state(handle, |s| s.visible = visible);
    }

    fn set_background(&mut self, handle: SurfaceHandle, background: &Background) {
        let background = background.clone();
        self.with_state(handle, |s| s.background = Some(background));
    }

    fn set_background_color(&mut self, handle: SurfaceHandle, color: Rgba) {
        self.with_state(handle, |s| s.background_color = Some(color));
    }

    fn mount(&mut self, parent: SurfaceHandle, child: SurfaceHandle) {
        self.with_state(child, |s| s.parent = Some(parent));
    }

    fn bounding_box(&self, handle: SurfaceHandle) -> Bounds {
        self.surfaces
            .get(&handle)
            .map(|s| Bounds::from_origin_size(s.position, s.size))
            .unwrap_or_default()
    }
}

//=== Scroller ============================================================

/// Viewport scroller collaborator driven by the camera.
pub trait Scroller: Send {
    fn scroll_to(&mut self, position: Point);

    /// Extent the viewport may scroll within.
    fn scrollable_size(&self) -> Size;

    /// Called by the scene whenever the stage is resized.
    fn set_content_size(&mut self, size: Size);
}

/// In-memory [`Scroller`] whose scrollable extent equals the stage.
#[derive(Debug, Default, Clone)]
pub struct HeadlessScroller {
    position: Point,
    content: Size,
}

impl HeadlessScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

impl Scroller for HeadlessScroller {
    fn scroll_to(&mut self, position: Point) {
        self.position = position;
    }

    fn scrollable_size(&self) -> Size {
        self.content
    }

    fn set_content_size(&mut self, size: Size) {
        self.content = size;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
