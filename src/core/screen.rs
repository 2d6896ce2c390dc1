//=========================================================================
// Game Screen
//=========================================================================
//
// Owner of the active scene and everything that reacts to input.
//
// Architecture:
// ```text
//   GameScreen
//     ├─ scene: Scene                          (coordinate authority)
//     ├─ router: InputRouter                   (InputEvent → GameEvent)
//     ├─ keyboard: ListenerRegistry<KeyboardKey>
//     ├─ mouse: ListenerRegistry<MouseKey>
//     ├─ controls: BTreeMap<ControlId, ControlSlot>
//     └─ now: Duration                         (virtual clock)
// ```
//
// Frame Flow:
// ```text
//   frame(inputs, dt)
//     ├─► bus.clear_all()
//     ├─► for each input: router → dispatch → deferred commands
//     └─► advance(dt): active controls tick, then scene gravity
// ```
//
// Everything runs on the thread that owns the screen. Callbacks get the
// scene through an `EventContext`; registry changes they request are
// applied once the current event has reached every listener.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::BTreeMap;
use std::time::Duration;

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::controls::{
    AdControl, Control, ControlContext, ControlId, ControlSlot, DragAndDropControl,
    FollowCursorOnClickControl, FollowCursorOnMoveControl, JumpYControl, Subscription, WsadControl,
};
use crate::core::error::EngineError;
use crate::core::geometry::Size;
use crate::core::input::event::{GameEvent, InputEvent, KeyCode, KeyboardEventKind, MouseEventKind, MouseTarget};
use crate::core::input::listener::{
    Capability, EventContext, Handler, KeyboardKey, ListenerId, ListenerRegistry, MouseKey, ScreenCommand,
};
use crate::core::input::router::InputRouter;
use crate::core::object::{GameObject, ObjectId};
use crate::core::scene::Scene;

//=== StandardControls ====================================================

/// Ids of the controls attached by [`GameScreen::attach_standard_controls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardControls {
    pub wsad: ControlId,
    pub ad: ControlId,
    pub jump: ControlId,
    pub drag_and_drop: ControlId,
    pub follow_cursor_on_move: ControlId,
    pub follow_cursor_on_click: ControlId,
}

//=== GameScreen ==========================================================

/// Active scene plus its listeners, controls and clock.
///
/// ```
/// use std::time::Duration;
/// use scrollstage_engine::core::geometry::Size;
/// use scrollstage_engine::core::input::{InputEvent, KeyCode, Modifiers};
/// use scrollstage_engine::core::object::GameObject;
/// use scrollstage_engine::core::controls::WsadControl;
/// use scrollstage_engine::core::scene::Scene;
/// use scrollstage_engine::core::screen::GameScreen;
///
/// let mut screen = GameScreen::new(Scene::new(Size::new(800, 600)));
/// let hero = screen.scene_mut().add_object(GameObject::new(20, 20).at(100, 100));
///
/// let wsad = screen.attach_control(WsadControl::new(hero)).unwrap();
/// screen.set_control_active(wsad, true).unwrap();
///
/// let press = InputEvent::KeyDown { key: KeyCode::KeyD, modifiers: Modifiers::NONE };
/// screen.frame(&[press], Duration::from_millis(10));
///
/// assert_eq!(screen.scene().object(hero).unwrap().x(), 105);
/// ```
pub struct GameScreen {
    scene: Scene,
    router: InputRouter,
    keyboard: ListenerRegistry<KeyboardKey>,
    mouse: ListenerRegistry<MouseKey>,
    controls: BTreeMap<ControlId, ControlSlot>,
    commands: Vec<ScreenCommand>,
    now: Duration,
}

impl GameScreen {
    //--- Construction -----------------------------------------------------

    /// Takes ownership of `scene` and starts its gravity.
    pub fn new(mut scene: Scene) -> Self {
        scene.start_gravity(Duration::ZERO);
        info!(target: "engine", "Screen showing {}", scene.id());

        Self {
            scene,
            router: InputRouter::new(),
            keyboard: ListenerRegistry::new(Capability::Keyboard),
            mouse: ListenerRegistry::new(Capability::Mouse),
            controls: BTreeMap::new(),
            commands: Vec::new(),
            now: Duration::ZERO,
        }
    }

    /// Replaces the active scene and returns the previous one.
    ///
    /// Listeners and controls belong to the scene they were set up for
    /// and are dropped with it.
    pub fn set_active_scene(&mut self, mut scene: Scene) -> Scene {
        for (id, slot) in self.controls.iter_mut() {
            let mut ctx = ControlContext {
                scene: &mut self.scene,
                now: self.now,
                id: *id,
            };
            slot.control.halt(&mut ctx);
        }
        self.controls.clear();
        self.keyboard.clear();
        self.mouse.clear();
        self.commands.clear();
        self.router.reset();

        self.scene.stop_gravity();
        scene.start_gravity(self.now);
        info!(target: "engine", "Screen switched from {} to {}", self.scene.id(), scene.id());
        std::mem::replace(&mut self.scene, scene)
    }

    //--- Accessors --------------------------------------------------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Virtual time since the screen was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Last cursor position in window coordinates.
    pub fn cursor(&self) -> (f32, f32) {
        self.router.cursor()
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.router.is_key_down(key)
    }

    /// Resizes the camera viewport (window resize).
    pub fn set_viewport(&mut self, viewport: Size) {
        debug!(target: "engine", "Viewport {}x{}", viewport.width, viewport.height);
        self.scene.set_viewport(viewport);
    }

    /// Removes an object together with its controls and the listeners
    /// that target it.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<GameObject> {
        let owned: Vec<ControlId> = self
            .controls
            .iter()
            .filter(|(_, slot)| slot.object == id)
            .map(|(control, _)| *control)
            .collect();
        for control in owned {
            if let Err(e) = self.detach_control(control) {
                debug!(target: "controls", "Detach on removal failed: {}", e);
            }
        }

        let target = MouseTarget::Object(id);
        let dropped = self.mouse.unregister_where(|(_, t)| *t == target);
        if dropped > 0 {
            debug!(target: "input", "Dropped {} listeners of removed {}", dropped, id);
        }

        self.scene.remove_object(id)
    }

    //=====================================================================
    // Listeners
    //=====================================================================

    /// Registers an active keyboard listener.
    pub fn listen_keyboard(
        &mut self,
        kind: KeyboardEventKind,
        key: KeyCode,
        callback: impl FnMut(&mut EventContext<'_>, &GameEvent) + Send + 'static,
    ) -> ListenerId {
        self.keyboard
            .register((kind, key), Handler::Callback(Box::new(callback)), true)
    }

    /// Registers an active mouse listener.
    pub fn listen_mouse(
        &mut self,
        kind: MouseEventKind,
        target: MouseTarget,
        callback: impl FnMut(&mut EventContext<'_>, &GameEvent) + Send + 'static,
    ) -> ListenerId {
        self.mouse
            .register((kind, target), Handler::Callback(Box::new(callback)), true)
    }

    /// Pauses or resumes a listener without unregistering it.
    pub fn set_listener_active(&mut self, listener: ListenerId, active: bool) -> bool {
        match listener.capability() {
            Capability::Keyboard => self.keyboard.set_active(listener, active),
            Capability::Mouse => self.mouse.set_active(listener, active),
        }
    }

    pub fn is_listener_active(&self, listener: ListenerId) -> Option<bool> {
        match listener.capability() {
            Capability::Keyboard => self.keyboard.is_active(listener),
            Capability::Mouse => self.mouse.is_active(listener),
        }
    }

    pub fn unregister_listener(&mut self, listener: ListenerId) -> bool {
        match listener.capability() {
            Capability::Keyboard => self.keyboard.unregister(listener),
            Capability::Mouse => self.mouse.unregister(listener),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.keyboard.len() + self.mouse.len()
    }

    //=====================================================================
    // Controls
    //=====================================================================

    /// Attaches `control` to this screen, inactive.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownObject`] if the control's object is not in
    /// the active scene.
    pub fn attach_control<C: Control>(&mut self, control: C) -> Result<ControlId, EngineError> {
        let object = control.object();
        if !self.scene.contains(object) {
            return Err(EngineError::UnknownObject(object));
        }

        let id = ControlId::next();
        let listeners = control
            .subscriptions()
            .into_iter()
            .map(|sub| match sub {
                Subscription::Keyboard { kind, key } => {
                    self.keyboard.register((kind, key), Handler::Control(id), false)
                }
                Subscription::Mouse { kind, target } => {
                    self.mouse.register((kind, target), Handler::Control(id), false)
                }
            })
            .collect();

        debug!(target: "controls", "Attached {:?} to {}", id, object);
        self.controls.insert(
            id,
            ControlSlot {
                control: Box::new(control),
                object,
                listeners,
                active: false,
            },
        );
        Ok(id)
    }

    /// Attaches the six built-in controls to `object`, all inactive.
    pub fn attach_standard_controls(&mut self, object: ObjectId) -> Result<StandardControls, EngineError> {
        Ok(StandardControls {
            wsad: self.attach_control(WsadControl::new(object))?,
            ad: self.attach_control(AdControl::new(object))?,
            jump: self.attach_control(JumpYControl::new(object))?,
            drag_and_drop: self.attach_control(DragAndDropControl::new(object))?,
            follow_cursor_on_move: self.attach_control(FollowCursorOnMoveControl::new(object))?,
            follow_cursor_on_click: self.attach_control(FollowCursorOnClickControl::new(object))?,
        })
    }

    /// Turns a control and all of its listeners on or off.
    ///
    /// Turning a control off also halts whatever it had in flight.
    pub fn set_control_active(&mut self, control: ControlId, active: bool) -> Result<(), EngineError> {
        let slot = self
            .controls
            .get_mut(&control)
            .ok_or(EngineError::UnknownControl(control))?;
        if slot.active == active {
            return Ok(());
        }
        slot.active = active;

        for listener in &slot.listeners {
            match listener.capability() {
                Capability::Keyboard => self.keyboard.set_active(*listener, active),
                Capability::Mouse => self.mouse.set_active(*listener, active),
            };
        }

        if !active {
            let mut ctx = ControlContext {
                scene: &mut self.scene,
                now: self.now,
                id: control,
            };
            slot.control.halt(&mut ctx);
        }

        debug!(target: "controls", "{:?} active: {}", control, active);
        Ok(())
    }

    pub fn is_control_active(&self, control: ControlId) -> Option<bool> {
        self.controls.get(&control).map(|slot| slot.active)
    }

    /// Halts and removes a control with its listeners.
    pub fn detach_control(&mut self, control: ControlId) -> Result<Box<dyn Control>, EngineError> {
        let mut slot = self
            .controls
            .remove(&control)
            .ok_or(EngineError::UnknownControl(control))?;

        let mut ctx = ControlContext {
            scene: &mut self.scene,
            now: self.now,
            id: control,
        };
        slot.control.halt(&mut ctx);

        for listener in slot.listeners {
            self.unregister_listener(listener);
        }
        debug!(target: "controls", "Detached {:?}", control);
        Ok(slot.control)
    }

    pub fn control<T: Control>(&self, control: ControlId) -> Option<&T> {
        self.controls.get(&control)?.control.as_any().downcast_ref()
    }

    pub fn control_mut<T: Control>(&mut self, control: ControlId) -> Option<&mut T> {
        self.controls.get_mut(&control)?.control.as_any_mut().downcast_mut()
    }

    //=====================================================================
    // Dispatch
    //=====================================================================

    /// One logic frame: input first, then `dt` of virtual time.
    ///
    /// The scene bus is cleared at the start, so after the call it holds
    /// exactly the messages of this frame.
    pub fn frame(&mut self, inputs: &[InputEvent], dt: Duration) {
        self.scene.bus_mut().clear_all();
        for input in inputs {
            self.handle_input(input);
        }
        self.advance(dt);
    }

    /// Routes one raw input event to the listeners.
    pub fn handle_input(&mut self, input: &InputEvent) {
        for event in self.router.route(input, &self.scene) {
            self.dispatch(&event);
        }
    }

    /// Delivers `event` to its active listeners in registration order.
    pub fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Keyboard { kind, key, .. } => deliver(
                &mut self.keyboard,
                &(*kind, *key),
                event,
                &mut self.scene,
                &mut self.controls,
                &mut self.commands,
                self.now,
            ),
            GameEvent::Mouse { kind, target, .. } => deliver(
                &mut self.mouse,
                &(*kind, *target),
                event,
                &mut self.scene,
                &mut self.controls,
                &mut self.commands,
                self.now,
            ),
        }
        self.apply_commands();
    }

    /// Moves the virtual clock forward by `dt`.
    ///
    /// Active controls run their due work first, then the scene's gravity.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;

        for (id, slot) in self.controls.iter_mut() {
            if !slot.active {
                continue;
            }
            let mut ctx = ControlContext {
                scene: &mut self.scene,
                now: self.now,
                id: *id,
            };
            slot.control.tick(&mut ctx);
        }

        self.scene.advance(self.now);
    }

    fn apply_commands(&mut self) {
        for command in std::mem::take(&mut self.commands) {
            match command {
                ScreenCommand::SetControlActive(control, active) => {
                    if let Err(e) = self.set_control_active(control, active) {
                        debug!(target: "input", "Deferred activation failed: {}", e);
                    }
                }
                ScreenCommand::SetListenerActive(listener, active) => {
                    self.set_listener_active(listener, active);
                }
                ScreenCommand::Unregister(listener) => {
                    self.unregister_listener(listener);
                }
            }
        }
    }
}

impl std::fmt::Debug for GameScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameScreen")
            .field("scene", &self.scene.id())
            .field("listeners", &self.listener_count())
            .field("controls", &self.controls.len())
            .field("now", &self.now)
            .finish()
    }
}

//--- Delivery ------------------------------------------------------------

fn deliver<K: Copy + Eq + std::hash::Hash>(
    registry: &mut ListenerRegistry<K>,
    key: &K,
    event: &GameEvent,
    scene: &mut Scene,
    controls: &mut BTreeMap<ControlId, ControlSlot>,
    commands: &mut Vec<ScreenCommand>,
    now: Duration,
) {
    for listener in registry.active_for(key) {
        let Some(record) = registry.record_mut(listener) else {
            continue;
        };
        match &mut record.handler {
            Handler::Callback(callback) => {
                let mut ctx = EventContext {
                    scene: &mut *scene,
                    now,
                    commands: &mut *commands,
                };
                callback(&mut ctx, event);
            }
            Handler::Control(control) => {
                let control = *control;
                let Some(slot) = controls.get_mut(&control) else {
                    trace!(target: "input", "Listener {:?} has no control", listener);
                    continue;
                };
                let mut ctx = ControlContext {
                    scene: &mut *scene,
                    now,
                    id: control,
                };
                slot.control.handle(event, &mut ctx);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
