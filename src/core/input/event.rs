//=========================================================================
// Input Event Types
//=========================================================================
//
// Two layers of input events:
//
// - `InputEvent`: raw, platform-normalized input (keys, buttons, cursor)
//   produced by the platform thread and batched per frame.
// - `GameEvent`: routed input as listeners see it, tagged with an event
//   kind, a key or a mouse target, and a payload.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (raw)
//         ↓
//    InputRouter (hover / hit testing / click synthesis)
//         ↓
//    GameEvent → ListenerRegistry → active listeners
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::object::ObjectId;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Side buttons, thumb buttons, macro keys.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier (location, not character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Keys the platform reports but the engine does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt), left/right not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
}

//=== InputEvent ==========================================================

/// Raw input event from the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode, modifiers: Modifiers },
    KeyUp { key: KeyCode, modifiers: Modifiers },
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Cursor moved, window client coordinates (pixels, top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// Unsupported event, ignored by the router.
    Unidentified,
}

//=== Game Event Kinds ====================================================

/// Keyboard event kinds listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardEventKind {
    Down,
    Up,
}

/// Mouse event kinds listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down,
    Up,
    Move,
    Enter,
    Leave,
    Click,
}

/// Where a mouse listener is attached.
///
/// `Scene` listeners hear every mouse event; `Object` listeners only the
/// ones whose cursor is over that object (hover for `Enter`/`Leave`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseTarget {
    Scene,
    Object(ObjectId),
}

//=== MousePayload ========================================================

/// Cursor data delivered with every mouse event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MousePayload {
    /// Cursor position in window coordinates.
    pub client_x: f32,
    pub client_y: f32,

    /// Cursor position in stage coordinates (client + camera offset).
    pub stage_x: f32,
    pub stage_y: f32,

    /// Button for `Down`/`Up`/`Click`, `None` otherwise.
    pub button: Option<MouseButton>,
}

//=== GameEvent ===========================================================

/// Input event as delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Keyboard {
        kind: KeyboardEventKind,
        key: KeyCode,
        modifiers: Modifiers,
    },
    Mouse {
        kind: MouseEventKind,
        target: MouseTarget,
        payload: MousePayload,
    },
}

impl GameEvent {
    /// Key of a keyboard event with the given kind.
    pub fn key_for(&self, wanted: KeyboardEventKind) -> Option<KeyCode> {
        match self {
            Self::Keyboard { kind, key, .. } if *kind == wanted => Some(*key),
            _ => None,
        }
    }

    /// Kind and payload of a mouse event.
    pub fn mouse(&self) -> Option<(MouseEventKind, MouseTarget, &MousePayload)> {
        match self {
            Self::Mouse { kind, target, payload } => Some((*kind, *target, payload)),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    #[test]
    fn cursor_moves_compare_by_position() {
        let a = InputEvent::MouseMoved { x: 10.0, y: 10.0 };
        let b = InputEvent::MouseMoved { x: 200.0, y: 300.0 };
        assert_ne!(a, b);
        assert_eq!(a, InputEvent::MouseMoved { x: 10.0, y: 10.0 });
    }

    #[test]
    fn key_events_compare_key_and_modifiers() {
        assert_eq!(key_down(KeyCode::KeyA), key_down(KeyCode::KeyA));
        assert_ne!(key_down(KeyCode::KeyA), key_down(KeyCode::KeyD));
        assert_ne!(
            key_down(KeyCode::KeyA),
            InputEvent::KeyDown { key: KeyCode::KeyA, modifiers: Modifiers::SHIFT }
        );
        assert_ne!(
            key_down(KeyCode::KeyA),
            InputEvent::KeyUp { key: KeyCode::KeyA, modifiers: Modifiers::NONE }
        );
    }

    #[test]
    fn key_for_matches_kind_only() {
        let event = GameEvent::Keyboard {
            kind: KeyboardEventKind::Down,
            key: KeyCode::Space,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(event.key_for(KeyboardEventKind::Down), Some(KeyCode::Space));
        assert_eq!(event.key_for(KeyboardEventKind::Up), None);
        assert!(event.mouse().is_none());
    }
}
