//=========================================================================
// Input
//=========================================================================
//
// From platform input to game listeners.
//
// Architecture:
// ```text
//   Platform thread                      Logic thread
//   ┌──────────────┐                    ┌──────────────────────────────┐
//   │ InputEvent   │ ──PlatformEvent──► │ InputRouter                  │
//   └──────────────┘                    │   ├─ key repeat filter       │
//                                       │   ├─ hover (Enter/Leave)     │
//                                       │   └─ click synthesis         │
//                                       │        ↓                     │
//                                       │ GameEvent                    │
//                                       │        ↓                     │
//                                       │ ListenerRegistry (keyboard / │
//                                       │   mouse) → callbacks/controls│
//                                       └──────────────────────────────┘
// ```
//
// Components:
// - `event`: raw platform events and the game events built from them
// - `listener`: ordered listener records with activation flags
// - `router`: raw → game event translation (crate internal)
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
pub mod listener;
pub(crate) mod router;

//=== Public API ==========================================================

pub use event::{
    GameEvent, InputEvent, KeyCode, KeyboardEventKind, Modifiers, MouseButton, MouseEventKind, MousePayload,
    MouseTarget,
};
pub use listener::{Callback, Capability, EventContext, KeyboardKey, ListenerId, MouseKey};
