//=========================================================================
// Scrollstage Engine
//=========================================================================
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                                        │
//         ├─ with_tps()              └─ default screen:                       ├─ logic thread
//         ├─ with_channel_capacity()    stage + camera sized                  └─ winit loop
//         ├─ with_window_size()         to the window                            (blocks)
//         └─ with_title()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::camera::Camera;
use crate::core::geometry::Size;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::scene::Scene;
use crate::core::screen::GameScreen;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== Defaults ============================================================

const DEFAULT_TPS: f64 = 60.0;
const DEFAULT_CHANNEL_CAPACITY: usize = 128;
const DEFAULT_WINDOW_SIZE: Size = Size::new(800, 600);
const DEFAULT_TITLE: &str = "Scrollstage";

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Window size**: 800x600 logical pixels
/// - **Title**: "Scrollstage"
///
/// # Examples
///
/// ```no_run
/// use scrollstage_engine::EngineBuilder;
/// use scrollstage_engine::core::object::GameObject;
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_window_size(1024, 768)
///     .with_title("Platformer")
///     .build()
///     .init(|screen| {
///         let hero = screen
///             .scene_mut()
///             .add_object(GameObject::new(32, 48).at(100, 100).with_collision(true).with_gravity(true));
///         let controls = screen.attach_standard_controls(hero).unwrap();
///         screen.set_control_active(controls.ad, true).unwrap();
///         screen.set_control_active(controls.jump, true).unwrap();
///     })
///     .run();
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    window_size: Size,
    title: String,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            tps: DEFAULT_TPS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            window_size: DEFAULT_WINDOW_SIZE,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Spams (gravity, controls) run on virtual time, so a lower rate
    /// only batches more of their fires into each tick.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the initial window size, also used for the default stage
    /// and camera viewport.
    ///
    /// # Panics
    ///
    /// Panics if either side is not positive.
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.window_size = Size::new(width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builds the engine with a screen showing an empty scene the size of
    /// the window, with a camera over it.
    pub fn build(self) -> Engine {
        info!(
            target: "engine",
            "Building engine (TPS: {}, channel: {}, window: {}x{})",
            self.tps, self.channel_capacity, self.window_size.width, self.window_size.height
        );

        let scene = Scene::new(self.window_size).with_camera(Camera::new(self.window_size));

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(GameScreen::new(scene)),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window_size: self.window_size,
            title: self.title,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Scrollstage engine runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► GameScreen: scene, listeners, controls
///   │
///   └─► Platform (winit event loop)
///         └─► Window, input buffering
///
/// Communication: bounded crossbeam channel (PlatformEvent)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
    window_size: Size,
    title: String,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Sets up the game on the screen before the engine runs: objects,
    /// platforms, controls, listeners, or a whole new scene through
    /// [`GameScreen::set_active_scene`].
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GameScreen),
    {
        info!(target: "engine", "Initializing game screen");
        self.orchestrator.init_screen(init_fn);
        self
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine runtime and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the bounded channel for platform → core communication
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: platform exits → logic thread terminates
    pub fn run(self) {
        info!(target: "engine", "Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) = bounded(self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.title, self.window_size);
        if let Err(e) = platform.run() {
            error!(target: "engine", "Platform error: {}", e);
        }

        //--- 4. Cleanup: wait for logic thread ----------------------------
        match core_handle.join() {
            Ok(()) => info!(target: "engine", "Core thread terminated cleanly"),
            Err(e) => error!(target: "engine", "Core thread panicked: {:?}", e),
        }

        info!(target: "engine", "Engine shutdown complete");
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("tps", &self.tps)
            .field("channel_capacity", &self.channel_capacity)
            .field("window_size", &self.window_size)
            .field("title", &self.title)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::GameObject;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.window_size, Size::new(800, 600));
        assert_eq!(builder.title, "Scrollstage");
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_window_size_panics_on_zero() {
        EngineBuilder::new().with_window_size(0, 600);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .with_window_size(1024, 768)
            .with_title("Test")
            .build();

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
        assert_eq!(engine.window_size, Size::new(1024, 768));
        assert_eq!(engine.title, "Test");
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn default_screen_matches_window() {
        let mut stage = None;
        let mut viewport = None;
        EngineBuilder::new().with_window_size(640, 480).build().init(|screen| {
            stage = Some(screen.scene().stage());
            viewport = screen.scene().camera().map(|c| c.viewport());
        });

        assert_eq!(stage, Some(Size::new(640, 480)));
        assert_eq!(viewport, Some(Size::new(640, 480)));
    }

    #[test]
    fn init_populates_screen() {
        let mut added = None;
        EngineBuilder::new().build().init(|screen| {
            added = Some(screen.scene_mut().add_object(GameObject::new(10, 10)));
        });
        assert!(added.is_some());
    }
}
