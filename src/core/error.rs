//=========================================================================
// Engine Errors
//=========================================================================
//
// Configuration errors raised while building a scene.
//
// Gameplay outcomes are never errors: a rejected move is a plain `false`
// from the scene, an out-of-range camera offset is ignored. Only wiring
// mistakes (a platform chunk without a size, an id from another scene)
// surface through this type.
//
//=========================================================================

use crate::core::controls::ControlId;
use crate::core::object::{ObjectId, PlatformId};
use crate::core::scene::SceneId;

//=== EngineError =========================================================

/// Configuration error reported at object, platform or control setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A platform chunk has no positive width.
    MissingWidth(ObjectId),

    /// A platform chunk has no positive height.
    MissingHeight(ObjectId),

    /// A platform created by another scene was used with this one.
    ForeignPlatform {
        platform: PlatformId,
        scene: SceneId,
    },

    /// The platform id is not known to this scene.
    UnknownPlatform(PlatformId),

    /// The object is not part of this scene.
    UnknownObject(ObjectId),

    /// The control was never attached or has been detached.
    UnknownControl(ControlId),

    /// The scene has no camera but the operation needs one.
    NoCamera,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingWidth(id) => write!(f, "Object {} must have a positive width", id),
            Self::MissingHeight(id) => write!(f, "Object {} must have a positive height", id),
            Self::ForeignPlatform { platform, scene } => {
                write!(f, "Platform {:?} does not belong to scene {}", platform, scene)
            }
            Self::UnknownPlatform(id) => write!(f, "Unknown platform {:?}", id),
            Self::UnknownObject(id) => write!(f, "Object {} is not in this scene", id),
            Self::UnknownControl(id) => write!(f, "Unknown control {:?}", id),
            Self::NoCamera => write!(f, "Scene has no camera"),
        }
    }
}

impl std::error::Error for EngineError {}

//=========================================================================
// Unit Tests
//=========================================================================
