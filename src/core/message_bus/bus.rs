//=========================================================================
// Message Bus
//=========================================================================
//
// Per-tick, type-keyed notification queues owned by the scene.
//
// Architecture:
//   Scene / Controls → push<M>()  → HashMap<TypeId, Vec<M>>
//                                         ↓
//   Game code        ← read<M>() / drain<M>()
//                                         ↓
//   GameScreen ───────→ clear_all() at the start of every frame
//
//=========================================================================

use std::any::TypeId;
use std::collections::HashMap;

use log::warn;

use super::queue::MessageQueue;

//=== Message =============================================================

/// Anything that can travel on the bus.
pub trait Message: Send + 'static {}

impl<T: Send + 'static> Message for T {}

//=== MessageBus ==========================================================

#[derive(Default)]
pub struct MessageBus {
    queues: HashMap<TypeId, Box<dyn MessageQueue>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Publishing -------------------------------------------------------

    pub fn push<M: Message>(&mut self, message: M) {
        let queue = self
            .queues
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()));

        match queue.as_any_mut().downcast_mut::<Vec<M>>() {
            Some(vec) => vec.push(message),
            None => warn!(target: "engine", "Message queue type mismatch, message dropped"),
        }
    }

    //--- Consuming --------------------------------------------------------

    /// Messages of type `M` published since the last clear, oldest first.
    pub fn read<M: Message>(&self) -> &[M] {
        self.queues
            .get(&TypeId::of::<M>())
            .and_then(|q| q.as_any().downcast_ref::<Vec<M>>())
            .map_or(&[], |v| v.as_slice())
    }

    /// Removes and returns the queued messages of type `M`.
    pub fn drain<M: Message>(&mut self) -> Vec<M> {
        self.queues
            .get_mut(&TypeId::of::<M>())
            .and_then(|q| q.as_any_mut().downcast_mut::<Vec<M>>())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn count<M: Message>(&self) -> usize {
        self.queues.get(&TypeId::of::<M>()).map_or(0, |q| q.len())
    }

    //--- Tick Boundary ----------------------------------------------------

    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.clear_queue();
        }
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("queues", &self.queues.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
