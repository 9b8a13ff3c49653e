//! Arena of reusable instance slots.

use std::sync::Arc;

use super::config::ActionConfig;
use super::instance::{ActionInstance, InstanceId};
use super::request::ActionRequest;

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    instance: Option<ActionInstance>,
}

/// Pooled storage for [`ActionInstance`]s, addressed by [`InstanceId`].
#[derive(Debug, Default)]
pub struct ActionPool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl ActionPool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Slot::default()).collect(),
            // popped from the back, so low indices are handed out first
            free: (0..capacity as u32).rev().collect(),
            live: 0,
        }
    }

    /// Places a fresh instance in a free slot, growing the arena if none is free.
    pub fn acquire(&mut self, config: Arc<ActionConfig>, request: ActionRequest) -> InstanceId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = InstanceId {
            index,
            generation: slot.generation,
        };
        slot.instance = Some(ActionInstance::new(id, config, request));
        self.live += 1;
        id
    }

    pub fn get(&self, id: InstanceId) -> Option<&ActionInstance> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.instance.as_ref())
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut ActionInstance> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.instance.as_mut())
    }

    /// Returns the slot to the free list. Stale or unknown handles are ignored.
    pub fn release(&mut self, id: InstanceId) -> Option<ActionInstance> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let instance = slot.instance.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(instance)
    }

    /// Instances currently checked out.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Slots allocated so far, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionId, ActionLogic};

    fn emote() -> Arc<ActionConfig> {
        Arc::new(ActionConfig::new(ActionId(1), "wave", ActionLogic::Emote))
    }

    #[test]
    fn released_slots_are_reused_with_new_generation() {
        let mut pool = ActionPool::with_capacity(1);
        let first = pool.acquire(emote(), ActionRequest::new(ActionId(1)));
        assert!(pool.release(first).is_some());

        let second = pool.acquire(emote(), ActionRequest::new(ActionId(1)));
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert_eq!(pool.capacity(), 1);

        // the stale handle no longer resolves
        assert!(pool.get(first).is_none());
        assert!(pool.get(second).is_some());
    }

    #[test]
    fn pool_grows_when_exhausted() {
        let mut pool = ActionPool::with_capacity(1);
        let a = pool.acquire(emote(), ActionRequest::new(ActionId(1)));
        let b = pool.acquire(emote(), ActionRequest::new(ActionId(1)));

        assert_ne!(a, b);
        assert_eq!(pool.live(), 2);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn double_release_is_ignored() {
        let mut pool = ActionPool::with_capacity(2);
        let id = pool.acquire(emote(), ActionRequest::new(ActionId(1)));
        assert!(pool.release(id).is_some());
        assert!(pool.release(id).is_none());
        assert_eq!(pool.live(), 0);
    }
}
