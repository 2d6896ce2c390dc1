//=========================================================================
// Winit Translation
//=========================================================================
//
// Winit window events → engine `InputEvent`s.
//
// Modifier state arrives in its own `ModifiersChanged` event, so the
// translator caches it and stamps it on every key and button event that
// follows. OS key auto-repeat is dropped here; the router still filters
// repeats for events fed in without a platform.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== WinitTranslator =====================================================

#[derive(Debug, Default)]
pub(crate) struct WinitTranslator {
    modifiers: Modifiers,
}

impl WinitTranslator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// `None` for auto-repeat and keys the engine does not map.
    pub(crate) fn key(&self, event: &KeyEvent) -> Option<InputEvent> {
        if event.repeat {
            return None;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        self.key_code(code, event.state)
    }

    pub(crate) fn button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = MouseButton::from(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    /// Cursor position in logical client pixels.
    pub(crate) fn cursor(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved { x: x as f32, y: y as f32 }
    }

    fn key_code(&self, code: WinitKeyCode, state: ElementState) -> Option<InputEvent> {
        let key = KeyCode::from(code);
        if key == KeyCode::Unidentified {
            return None;
        }
        let modifiers = self.modifiers;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        })
    }
}

//=== Conversions =========================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Both enums name keys alike, so one list maps the shared subset.
macro_rules! same_named_keys {
    ($code:expr; $($name:ident),* $(,)?) => {
        match $code {
            $(WinitKeyCode::$name => KeyCode::$name,)*
            _ => KeyCode::Unidentified,
        }
    };
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        same_named_keys!(code;
            Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
            KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
            KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
            ArrowDown, ArrowLeft, ArrowRight, ArrowUp,
            Space, Enter, Escape, Tab, Backspace, Delete,
        )
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_alt() -> ModifiersState {
        ModifiersState::CONTROL | ModifiersState::ALT
    }

    #[test]
    fn modifiers_stamp_later_events() {
        let mut translator = WinitTranslator::new();
        assert_eq!(translator.modifiers(), Modifiers::NONE);

        translator.set_modifiers(ctrl_alt());
        let event = translator.button(WinitMouseButton::Left, ElementState::Pressed);

        match event {
            InputEvent::MouseButtonDown { button, modifiers } => {
                assert_eq!(button, MouseButton::Left);
                assert!(modifiers.ctrl && modifiers.alt && !modifiers.shift);
            }
            other => panic!("Expected MouseButtonDown, got {:?}", other),
        }
    }

    #[test]
    fn key_codes_map_by_state() {
        let mut translator = WinitTranslator::new();
        translator.set_modifiers(ModifiersState::SHIFT);

        match translator.key_code(WinitKeyCode::KeyW, ElementState::Pressed) {
            Some(InputEvent::KeyDown { key, modifiers }) => {
                assert_eq!(key, KeyCode::KeyW);
                assert_eq!(modifiers, Modifiers::SHIFT);
            }
            other => panic!("Expected KeyDown, got {:?}", other),
        }
        assert!(matches!(
            translator.key_code(WinitKeyCode::Space, ElementState::Released),
            Some(InputEvent::KeyUp { key: KeyCode::Space, .. })
        ));
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        let translator = WinitTranslator::new();
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
        assert!(translator.key_code(WinitKeyCode::F13, ElementState::Pressed).is_none());
    }

    #[test]
    fn movement_keys_convert() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyD), KeyCode::KeyD);
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowUp), KeyCode::ArrowUp);
        assert_eq!(KeyCode::from(WinitKeyCode::Digit7), KeyCode::Digit7);
    }

    #[test]
    fn extra_buttons_collapse_to_other() {
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
    }

    #[test]
    fn cursor_carries_client_position() {
        let translator = WinitTranslator::new();
        match translator.cursor(12.5, 40.0) {
            InputEvent::MouseMoved { x, y } => assert_eq!((x, y), (12.5, 40.0)),
            other => panic!("Expected MouseMoved, got {:?}", other),
        }
    }
}
