//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Bridges winit (OS window and input) with the logic thread.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  winit event loop        │    │  EventCollector      │
//  │   ↓                      │    │   ↓                  │
//  │  WinitTranslator         │    │  GameScreen          │
//  │   ├─ modifiers cache     │    │   ├─ InputRouter     │
//  │   └─ repeat filter       │    │   ├─ listeners       │
//  │   ↓                      │    │   └─ controls        │
//  │  FrameBuffer             │    │                      │
//  │   ├─ discrete: Vec<>     │    └──────────────────────┘
//  │   ├─ cursor: last move   │             ↑
//  │   └─ resize: last size   │             │
//  │   ↓                      │             │
//  │  RedrawRequested (flush) ├─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// The redraw is the frame boundary: everything buffered since the last
// one is sent as a single batch. A disconnected channel is logged and the
// window stays closable.
//
// winit wants the main thread on macOS/iOS, so this runs on the thread
// that called `Engine::run()`.
//
//=========================================================================

//=== Submodules ==========================================================

mod frame_buffer;
mod translate;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::geometry::Size;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use frame_buffer::FrameBuffer;
use translate::WinitTranslator;

//=== Platform ============================================================

/// Window owner and input aggregator.
///
/// Not `Send`: it stays on the main thread and talks to the logic thread
/// only through the channel.
pub(crate) struct Platform {
    /// Created lazily in `resumed()`.
    window: Option<Window>,
    title: String,
    size: Size,
    buffer: FrameBuffer,
    event_sender: Sender<PlatformEvent>,
    translator: WinitTranslator,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub fn new(event_sender: Sender<PlatformEvent>, title: String, size: Size) -> Self {
        info!(target: "platform", "Platform subsystem initialized ({}x{})", size.width, size.height);
        Self {
            window: None,
            title,
            size,
            buffer: FrameBuffer::new(),
            event_sender,
            translator: WinitTranslator::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// [`PlatformError::EventLoopCreation`] when the loop cannot be built,
    /// [`PlatformError::EventLoopExecution`] when it fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms that require it.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends the frame's resize and input batch to the logic thread.
    fn flush(&mut self) {
        if let Some((width, height)) = self.buffer.take_resize() {
            self.send(PlatformEvent::Resized { width, height });
        }

        if let Some((discrete, continuous)) = self.buffer.drain_inputs() {
            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete.len(),
                continuous.len()
            );
            self.send(PlatformEvent::Inputs { discrete, continuous });
        }
    }

    fn send(&self, event: PlatformEvent) {
        if let Err(e) = self.event_sender.send(event) {
            warn!(target: "platform::input", "Channel disconnected, dropping {:?}", e.into_inner());
        }
    }

    fn window_attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.size.width as u32, self.size.height as u32))
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first activation (and never again on mobile
    /// resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window \"{}\" created: {}x{} @ {}x DPI",
                    self.title,
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(physical) => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical: LogicalSize<u32> = physical.to_logical(scale);
                debug!(target: "platform", "Window resized to {}x{}", logical.width, logical.height);
                self.buffer.push_resize(logical.width, logical.height);
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.translator.set_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f64>(scale);
                self.buffer.push_cursor(self.translator.cursor(logical.x, logical.y));
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => match self.translator.key(key_event) {
                Some(event) => self.buffer.push_discrete(event),
                None => trace!(target: "platform::input", "Key repeat or unmapped key ignored"),
            },

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.translator.button(*button, *state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::RedrawRequested => {
                self.flush();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{InputEvent, KeyCode, Modifiers};
    use crossbeam_channel::unbounded;

    fn platform() -> (Platform, crossbeam_channel::Receiver<PlatformEvent>) {
        let (tx, rx) = unbounded();
        (Platform::new(tx, "Test".to_string(), Size::new(320, 240)), rx)
    }

    fn space() -> InputEvent {
        InputEvent::KeyDown {
            key: KeyCode::Space,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn window_is_created_lazily() {
        let (platform, _rx) = platform();
        assert!(platform.window().is_none());
    }

    #[test]
    fn flush_of_empty_frame_sends_nothing() {
        let (mut platform, rx) = platform();
        platform.flush();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_buffered_inputs_once() {
        let (mut platform, rx) = platform();
        platform.buffer.push_discrete(space());

        platform.flush();
        platform.flush();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete.len(), 1);
                assert!(continuous.is_empty());
            }
            other => panic!("Expected Inputs event, got {:?}", other),
        }
        assert!(rx.try_recv().is_err(), "Second flush should not send");
    }

    #[test]
    fn resize_precedes_inputs() {
        let (mut platform, rx) = platform();
        platform.buffer.push_discrete(space());
        platform.buffer.push_resize(640, 480);

        platform.flush();

        assert!(matches!(rx.try_recv(), Ok(PlatformEvent::Resized { width: 640, height: 480 })));
        assert!(matches!(rx.try_recv(), Ok(PlatformEvent::Inputs { .. })));
    }

    #[test]
    fn flush_survives_disconnected_channel() {
        let (mut platform, rx) = platform();
        platform.buffer.push_discrete(space());
        drop(rx);

        platform.flush();
    }

    #[test]
    fn platform_error_display_format() {
        let err = PlatformError::EventLoopCreation("no display".to_string());
        assert_eq!(err.to_string(), "Event loop creation failed: no display");
    }
}
