//=========================================================================
// Geometry
//=========================================================================
//
// Integer pixel primitives shared by the scene, camera and controls.
//
// All coordinates are stage pixels with a top-left origin. Intervals are
// half-open: an object at x = 10 with width 5 covers [10, 15).
//
//=========================================================================

//=== Axis ================================================================

/// Coordinate axis of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

//=== Side ================================================================

/// Side of an object on which a collision or border hit happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Side hit when moving along `axis` in the given direction.
    pub fn of_move(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, true) => Side::Right,
            (Axis::X, false) => Side::Left,
            (Axis::Y, true) => Side::Bottom,
            (Axis::Y, false) => Side::Top,
        }
    }
}

//=== Point ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

//=== Size ================================================================

/// Width and height in pixels.
///
/// Signed so it mixes with coordinates without casts. A size is only
/// usable for collision and platform placement when both sides are
/// positive, see [`Size::is_positive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self { width: 0, height: 0 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

//=== Bounds ==============================================================

/// Axis-aligned bounding box, `right` and `bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            left: origin.x,
            right: origin.x.saturating_add(size.width),
            top: origin.y,
            bottom: origin.y.saturating_add(size.height),
        }
    }

    /// Start and end of the box along `axis`.
    pub fn span(&self, axis: Axis) -> Span {
        match axis {
            Axis::X => Span::new(self.left, self.right),
            Axis::Y => Span::new(self.top, self.bottom),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// True when the two boxes share area (touching edges do not count).
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.span(Axis::X).overlaps(&other.span(Axis::X))
            && self.span(Axis::Y).overlaps(&other.span(Axis::Y))
    }
}

//=== Span ================================================================

/// One-dimensional half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: i32,
    pub end: i32,
}

impl Span {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Strict overlap test.
    ///
    /// Either start lies strictly inside the other interval, or both
    /// starts coincide. Intervals that merely touch (`a.end == b.start`)
    /// do not overlap, which lets objects slide past each other's edges.
    pub fn overlaps(&self, other: &Span) -> bool {
        if self.start >= self.end || other.start >= other.end {
            return false;
        }
        self.start == other.start
            || (self.start > other.start && self.start < other.end)
            || (other.start > self.start && other.start < self.end)
    }

    pub fn shifted_to(&self, start: i32) -> Span {
        Span::new(start, start.saturating_add(self.end - self.start))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
