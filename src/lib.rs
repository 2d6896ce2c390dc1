//=========================================================================
// Scrollstage Engine - Library Root
//=========================================================================
//
// A 2D scene-graph engine for scrolling platform games: positioned
// rectangles on a stage, a collision and gravity authority, a following
// camera and input controls that move objects through that authority.
//
// Typical usage:
// ```no_run
// use scrollstage_engine::prelude::*;
//
// EngineBuilder::new()
//     .with_title("Demo")
//     .build()
//     .init(|screen| {
//         let hero = screen.scene_mut().add_object(GameObject::new(20, 20).at(50, 50));
//         if let Ok(controls) = screen.attach_standard_controls(hero) {
//             let _ = screen.set_control_active(controls.wsad, true);
//         }
//     })
//     .run();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the whole engine model (scene, objects, camera, input,
// controls) and runs headless, so games and tests can drive it directly
// through `GameScreen`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit window and event loop. `engine` wires it to
// the logic thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
