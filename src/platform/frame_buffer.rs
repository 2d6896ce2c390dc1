//=========================================================================
// Frame Buffer
//=========================================================================
//
// Holds the platform events of one display frame until the redraw
// flushes them to the logic thread.
//
// - discrete: key and button transitions, every one kept in order
// - continuous: cursor motion, only the last position survives
//
//=========================================================================

use crate::core::input::event::InputEvent;

//=== FrameBuffer =========================================================

#[derive(Debug, Default)]
pub(crate) struct FrameBuffer {
    discrete: Vec<InputEvent>,
    cursor: Option<InputEvent>,
    resized: Option<(u32, u32)>,
}

impl FrameBuffer {
    pub(crate) fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(32),
            ..Self::default()
        }
    }

    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        self.discrete.push(event);
    }

    pub(crate) fn push_cursor(&mut self, event: InputEvent) {
        self.cursor = Some(event);
    }

    pub(crate) fn push_resize(&mut self, width: u32, height: u32) {
        self.resized = Some((width, height));
    }

    /// Input batch of the frame, `None` when nothing happened.
    pub(crate) fn drain_inputs(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.discrete.is_empty() && self.cursor.is_none() {
            return None;
        }
        let discrete = std::mem::take(&mut self.discrete);
        let continuous = self.cursor.take().into_iter().collect();
        Some((discrete, continuous))
    }

    pub(crate) fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.resized.take()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.cursor.is_none() && self.resized.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
