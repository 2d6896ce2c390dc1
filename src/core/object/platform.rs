//=========================================================================
// Platform
//=========================================================================
//
// A horizontal run of chunk objects laid side by side along the stage
// floor. The scene owns both the chunks and the platform record; the
// platform only remembers which chunks it placed and where the next one
// goes. Placement and culling live in `Scene` (see `scene::platforms`).
//
//=========================================================================

use crate::core::object::ObjectId;
use crate::core::scene::SceneId;

/// Camera padding used when deciding whether a chunk is visible.
pub const DEFAULT_VISIBILITY_PADDING: i32 = 256;

//=== PlatformId ==========================================================

/// Platform handle, valid only for the scene that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformId {
    pub(crate) scene: SceneId,
    pub(crate) index: usize,
}

//=== Platform ============================================================

#[derive(Debug, Clone)]
pub struct Platform {
    pub(crate) x: i32,
    pub(crate) width: i32,
    pub(crate) chunks: Vec<ObjectId>,
    pub(crate) visibility_padding: i32,
}

impl Platform {
    pub(crate) fn new(x: i32) -> Self {
        Self {
            x,
            width: 0,
            chunks: Vec::new(),
            visibility_padding: DEFAULT_VISIBILITY_PADDING,
        }
    }

    /// Stage x of the first chunk.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Sum of chunk widths.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Chunks in placement order, left to right.
    pub fn chunks(&self) -> &[ObjectId] {
        &self.chunks
    }

    pub fn visibility_padding(&self) -> i32 {
        self.visibility_padding
    }

    /// Stage x where the next chunk will be placed.
    pub(crate) fn next_chunk_x(&self) -> i32 {
        self.x + self.width
    }
}
