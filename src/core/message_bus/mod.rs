//=========================================================================
// Message Bus Module
//=========================================================================

mod bus;
mod messages;
mod queue;

pub use bus::{Message, MessageBus};
pub use messages::{ControlStatus, CursorRequest, ObjectEvent, ObjectEventKind};
