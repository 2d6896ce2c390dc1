//=========================================================================
// Message Queue Trait
//=========================================================================
//
// Type-erased storage for one message type, so the bus can keep every
// queue in a single map and clear them all at a tick boundary.
//
//=========================================================================

use std::any::Any;

use super::Message;

//=========================================================================

pub(super) trait MessageQueue: Send {
    /// Drops queued messages, keeping the allocation.
    fn clear_queue(&mut self);

    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<M: Message> MessageQueue for Vec<M> {
    fn clear_queue(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_capacity() {
        let mut queue: Vec<u32> = Vec::with_capacity(32);
        queue.extend(0..10);
        let queue: &mut dyn MessageQueue = &mut queue;

        queue.clear_queue();

        assert_eq!(queue.len(), 0);
        let vec = queue.as_any().downcast_ref::<Vec<u32>>().unwrap();
        assert!(vec.capacity() >= 32);
    }

    #[test]
    fn downcast_to_wrong_type_fails() {
        let mut queue: Vec<u32> = vec![1];
        let queue: &mut dyn MessageQueue = &mut queue;
        assert!(queue.as_any_mut().downcast_mut::<Vec<i64>>().is_none());
    }
}
