//=========================================================================
// Input Router
//=========================================================================
//
// Turns raw platform input into the game events listeners subscribe to.
//
// Architecture:
//   InputEvent → route() → held keys / pressed buttons / hover → GameEvent*
//
// Per raw event:
// ```text
//   KeyDown      → Keyboard Down          (auto-repeat swallowed)
//   KeyUp        → Keyboard Up
//   MouseMoved   → Leave(old) Enter(new) Move(object) Move(scene)
//   ButtonDown   → Down(object) Down(scene)
//   ButtonUp     → Up(object) Up(scene) Click(object) Click(scene)
// ```
//
// Object-targeted events always come before the scene-targeted ones, the
// same order a bubbling event reaches element and window listeners.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{
    GameEvent, InputEvent, KeyCode, KeyboardEventKind, Modifiers, MouseButton, MouseEventKind,
    MousePayload, MouseTarget,
};
use crate::core::geometry::Point;
use crate::core::object::ObjectId;
use crate::core::scene::Scene;

//=== InputRouter =========================================================

#[derive(Debug, Default)]
pub(crate) struct InputRouter {
    keys_down: HashSet<KeyCode>,
    /// Held buttons with the object they were pressed on.
    buttons_down: HashMap<MouseButton, Option<ObjectId>>,
    cursor: (f32, f32),
    hovered: Option<ObjectId>,
    modifiers: Modifiers,
}

impl InputRouter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Last cursor position in window coordinates.
    pub(crate) fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub(crate) fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    pub(crate) fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Forgets held keys, buttons and hover (used on scene change).
    pub(crate) fn reset(&mut self) {
        self.keys_down.clear();
        self.buttons_down.clear();
        self.hovered = None;
    }

    //--- Routing ----------------------------------------------------------

    pub(crate) fn route(&mut self, event: &InputEvent, scene: &Scene) -> Vec<GameEvent> {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = *modifiers;
                if !self.keys_down.insert(*key) {
                    trace!(target: "input", "Swallowed auto-repeat of {:?}", key);
                    return Vec::new();
                }
                vec![self.keyboard(KeyboardEventKind::Down, *key)]
            }

            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = *modifiers;
                self.keys_down.remove(key);
                vec![self.keyboard(KeyboardEventKind::Up, *key)]
            }

            InputEvent::MouseMoved { x, y } => {
                self.cursor = (*x, *y);
                self.route_move(scene)
            }

            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = *modifiers;
                let payload = self.payload(scene, Some(*button));
                let hit = self.hit(scene, &payload);
                self.buttons_down.insert(*button, hit);

                let mut out = Vec::with_capacity(2);
                if let Some(id) = hit {
                    out.push(mouse(MouseEventKind::Down, MouseTarget::Object(id), payload));
                }
                out.push(mouse(MouseEventKind::Down, MouseTarget::Scene, payload));
                out
            }

            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = *modifiers;
                let payload = self.payload(scene, Some(*button));
                let hit = self.hit(scene, &payload);
                let pressed = self.buttons_down.remove(button);

                let mut out = Vec::with_capacity(4);
                if let Some(id) = hit {
                    out.push(mouse(MouseEventKind::Up, MouseTarget::Object(id), payload));
                }
                out.push(mouse(MouseEventKind::Up, MouseTarget::Scene, payload));

                if let Some(pressed_on) = pressed {
                    if let (Some(down), Some(up)) = (pressed_on, hit) {
                        if down == up {
                            out.push(mouse(MouseEventKind::Click, MouseTarget::Object(up), payload));
                        }
                    }
                    out.push(mouse(MouseEventKind::Click, MouseTarget::Scene, payload));
                }
                out
            }

            InputEvent::Unidentified => Vec::new(),
        }
    }

    fn route_move(&mut self, scene: &Scene) -> Vec<GameEvent> {
        let payload = self.payload(scene, None);
        let hit = self.hit(scene, &payload);
        let mut out = Vec::with_capacity(4);

        if hit != self.hovered {
            if let Some(old) = self.hovered {
                out.push(mouse(MouseEventKind::Leave, MouseTarget::Object(old), payload));
            }
            if let Some(new) = hit {
                out.push(mouse(MouseEventKind::Enter, MouseTarget::Object(new), payload));
            }
            self.hovered = hit;
        }

        if let Some(id) = hit {
            out.push(mouse(MouseEventKind::Move, MouseTarget::Object(id), payload));
        }
        out.push(mouse(MouseEventKind::Move, MouseTarget::Scene, payload));
        out
    }

    //--- Helpers ----------------------------------------------------------

    fn keyboard(&self, kind: KeyboardEventKind, key: KeyCode) -> GameEvent {
        GameEvent::Keyboard {
            kind,
            key,
            modifiers: self.modifiers,
        }
    }

    fn payload(&self, scene: &Scene, button: Option<MouseButton>) -> MousePayload {
        let offset = scene.camera().map_or(Point::ORIGIN, |c| c.offset());
        MousePayload {
            client_x: self.cursor.0,
            client_y: self.cursor.1,
            stage_x: self.cursor.0 + offset.x as f32,
            stage_y: self.cursor.1 + offset.y as f32,
            button,
        }
    }

    fn hit(&self, scene: &Scene, payload: &MousePayload) -> Option<ObjectId> {
        let point = Point::new(payload.stage_x.floor() as i32, payload.stage_y.floor() as i32);
        scene.topmost_object_at(point)
    }
}

fn mouse(kind: MouseEventKind, target: MouseTarget, payload: MousePayload) -> GameEvent {
    GameEvent::Mouse {
        kind,
        target,
        payload,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::camera::Camera;
    use crate::core::geometry::Size;
    use crate::core::object::GameObject;

    fn kinds(events: &[GameEvent]) -> Vec<(MouseEventKind, MouseTarget)> {
        events
            .iter()
            .filter_map(|e| e.mouse().map(|(kind, target, _)| (kind, target)))
            .collect()
    }

    fn scene_with_box() -> (Scene, ObjectId) {
        let mut scene = Scene::new(Size::new(800, 600));
        let id = scene.add_object(GameObject::new(50, 50).at(100, 100));
        (scene, id)
    }

    const LEFT_DOWN: InputEvent = InputEvent::MouseButtonDown {
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    };
    const LEFT_UP: InputEvent = InputEvent::MouseButtonUp {
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    };

    //=====================================================================
    // Keyboard
    //=====================================================================

    #[test]
    fn key_repeat_is_swallowed() {
        let (scene, _) = scene_with_box();
        let mut router = InputRouter::new();
        let down = InputEvent::KeyDown { key: KeyCode::KeyD, modifiers: Modifiers::NONE };
        let up = InputEvent::KeyUp { key: KeyCode::KeyD, modifiers: Modifiers::NONE };

        assert_eq!(router.route(&down, &scene).len(), 1);
        assert!(router.route(&down, &scene).is_empty());
        assert!(router.is_key_down(KeyCode::KeyD));

        let out = router.route(&up, &scene);
        assert_eq!(out[0].key_for(KeyboardEventKind::Up), Some(KeyCode::KeyD));
        assert!(!router.is_key_down(KeyCode::KeyD));
    }

    //=====================================================================
    // Mouse
    //=====================================================================

    #[test]
    fn hover_produces_enter_and_leave() {
        let (scene, id) = scene_with_box();
        let mut router = InputRouter::new();

        let over = router.route(&InputEvent::MouseMoved { x: 120.0, y: 120.0 }, &scene);
        assert_eq!(
            kinds(&over),
            vec![
                (MouseEventKind::Enter, MouseTarget::Object(id)),
                (MouseEventKind::Move, MouseTarget::Object(id)),
                (MouseEventKind::Move, MouseTarget::Scene),
            ]
        );

        let away = router.route(&InputEvent::MouseMoved { x: 10.0, y: 10.0 }, &scene);
        assert_eq!(
            kinds(&away),
            vec![
                (MouseEventKind::Leave, MouseTarget::Object(id)),
                (MouseEventKind::Move, MouseTarget::Scene),
            ]
        );
        assert_eq!(router.hovered(), None);
    }

    #[test]
    fn press_and_release_on_object_clicks_it() {
        let (scene, id) = scene_with_box();
        let mut router = InputRouter::new();
        router.route(&InputEvent::MouseMoved { x: 110.0, y: 110.0 }, &scene);

        let down = router.route(&LEFT_DOWN, &scene);
        assert_eq!(
            kinds(&down),
            vec![
                (MouseEventKind::Down, MouseTarget::Object(id)),
                (MouseEventKind::Down, MouseTarget::Scene),
            ]
        );

        let up = router.route(&LEFT_UP, &scene);
        assert_eq!(
            kinds(&up),
            vec![
                (MouseEventKind::Up, MouseTarget::Object(id)),
                (MouseEventKind::Up, MouseTarget::Scene),
                (MouseEventKind::Click, MouseTarget::Object(id)),
                (MouseEventKind::Click, MouseTarget::Scene),
            ]
        );
    }

    #[test]
    fn release_elsewhere_clicks_scene_only() {
        let (scene, _) = scene_with_box();
        let mut router = InputRouter::new();
        router.route(&InputEvent::MouseMoved { x: 110.0, y: 110.0 }, &scene);
        router.route(&LEFT_DOWN, &scene);
        router.route(&InputEvent::MouseMoved { x: 500.0, y: 500.0 }, &scene);

        let up = router.route(&LEFT_UP, &scene);
        assert_eq!(
            kinds(&up),
            vec![
                (MouseEventKind::Up, MouseTarget::Scene),
                (MouseEventKind::Click, MouseTarget::Scene),
            ]
        );
    }

    #[test]
    fn payload_adds_camera_offset() {
        let mut scene = Scene::new(Size::new(2000, 600)).with_camera(Camera::new(Size::new(800, 600)));
        scene.update_camera(|c| c.set_x(300));
        let mut router = InputRouter::new();

        let out = router.route(&InputEvent::MouseMoved { x: 10.0, y: 20.0 }, &scene);
        let (_, _, payload) = out[0].mouse().unwrap();
        assert_eq!((payload.client_x, payload.client_y), (10.0, 20.0));
        assert_eq!((payload.stage_x, payload.stage_y), (310.0, 20.0));
        assert_eq!(payload.button, None);
    }
}
