//=========================================================================
// Listener Registry
//=========================================================================
//
// Ordered listener records keyed by what they listen to.
//
// Architecture:
// ```text
//   ListenerRegistry<K>
//     ├─ by_key: HashMap<K, Vec<ListenerRecord>>   (registration order)
//     └─ index:  HashMap<ListenerId, K>            (id → bucket)
//
//   keyboard: K = (KeyboardEventKind, KeyCode)
//   mouse:    K = (MouseEventKind, MouseTarget)
// ```
//
// Records stay registered while inactive; dispatch simply skips them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::event::{GameEvent, KeyCode, KeyboardEventKind, MouseEventKind, MouseTarget};
use crate::core::controls::ControlId;
use crate::core::scene::Scene;

//=== Keys ================================================================

pub type KeyboardKey = (KeyboardEventKind, KeyCode);
pub type MouseKey = (MouseEventKind, MouseTarget);

//=== Capability ==========================================================

/// Input family a listener was registered for. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Keyboard,
    Mouse,
}

//=== ListenerId ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId {
    capability: Capability,
    seq: u64,
}

impl ListenerId {
    fn next(capability: Capability) -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self {
            capability,
            seq: NEXT.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }
}

//=== EventContext ========================================================

/// Changes a callback asks for, applied once the current event has been
/// delivered to every listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenCommand {
    SetControlActive(ControlId, bool),
    SetListenerActive(ListenerId, bool),
    Unregister(ListenerId),
}

/// What a listener callback can reach while handling an event.
pub struct EventContext<'a> {
    pub scene: &'a mut Scene,
    pub now: Duration,
    pub(crate) commands: &'a mut Vec<ScreenCommand>,
}

impl EventContext<'_> {
    pub fn set_control_active(&mut self, control: ControlId, active: bool) {
        self.commands.push(ScreenCommand::SetControlActive(control, active));
    }

    pub fn set_listener_active(&mut self, listener: ListenerId, active: bool) {
        self.commands.push(ScreenCommand::SetListenerActive(listener, active));
    }

    pub fn unregister_listener(&mut self, listener: ListenerId) {
        self.commands.push(ScreenCommand::Unregister(listener));
    }
}

//=== Handler =============================================================

pub type Callback = Box<dyn FnMut(&mut EventContext<'_>, &GameEvent) + Send>;

/// Who receives the events of a record.
pub(crate) enum Handler {
    /// Routed to `Control::handle` of the owning control.
    Control(ControlId),
    Callback(Callback),
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Control(id) => f.debug_tuple("Control").field(id).finish(),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

//=== ListenerRecord ======================================================

#[derive(Debug)]
pub(crate) struct ListenerRecord {
    pub(crate) id: ListenerId,
    pub(crate) active: bool,
    pub(crate) handler: Handler,
}

//=== ListenerRegistry ====================================================

#[derive(Debug)]
pub(crate) struct ListenerRegistry<K> {
    capability: Capability,
    by_key: HashMap<K, Vec<ListenerRecord>>,
    index: HashMap<ListenerId, K>,
}

impl<K: Copy + Eq + Hash> ListenerRegistry<K> {
    pub(crate) fn new(capability: Capability) -> Self {
        Self {
            capability,
            by_key: HashMap::new(),
            index: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    pub(crate) fn register(&mut self, key: K, handler: Handler, active: bool) -> ListenerId {
        let id = ListenerId::next(self.capability);
        self.by_key.entry(key).or_default().push(ListenerRecord {
            id,
            active,
            handler,
        });
        self.index.insert(id, key);
        id
    }

    pub(crate) fn unregister(&mut self, id: ListenerId) -> bool {
        let Some(key) = self.index.remove(&id) else {
            return false;
        };
        if let Some(records) = self.by_key.get_mut(&key) {
            records.retain(|r| r.id != id);
            if records.is_empty() {
                self.by_key.remove(&key);
            }
        }
        true
    }

    /// Drops every record whose key matches `predicate`.
    pub(crate) fn unregister_where(&mut self, mut predicate: impl FnMut(&K) -> bool) -> usize {
        let doomed: Vec<ListenerId> = self
            .index
            .iter()
            .filter(|(_, key)| predicate(key))
            .map(|(id, _)| *id)
            .collect();
        let mut removed = 0;
        for id in doomed {
            if self.unregister(id) {
                removed += 1;
            }
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.by_key.clear();
        self.index.clear();
    }

    //--- Activation -------------------------------------------------------

    pub(crate) fn set_active(&mut self, id: ListenerId, active: bool) -> bool {
        match self.record_mut(id) {
            Some(record) => {
                record.active = active;
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_active(&self, id: ListenerId) -> Option<bool> {
        let key = self.index.get(&id)?;
        self.by_key
            .get(key)?
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.active)
    }

    //--- Dispatch Support -------------------------------------------------

    /// Active listeners for `key`, in registration order.
    pub(crate) fn active_for(&self, key: &K) -> Vec<ListenerId> {
        self.by_key
            .get(key)
            .map(|records| records.iter().filter(|r| r.active).map(|r| r.id).collect())
            .unwrap_or_default()
    }

    pub(crate) fn record_mut(&mut self, id: ListenerId) -> Option<&mut ListenerRecord> {
        let key = self.index.get(&id)?;
        self.by_key.get_mut(key)?.iter_mut().find(|r| r.id == id)
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
