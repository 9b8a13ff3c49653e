//! Lifecycle journal recorded by the player.

use std::collections::VecDeque;

use crate::action::{ActionId, ActionLogic, InstanceId};
use crate::types::EntityId;

/// Why a request or queued instance was dropped without running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiscardReason {
    /// Queue time depth was at or above the ceiling.
    QueueFull,
    /// No catalog entry for the requested id.
    UnknownAction,
    /// Reached the head before its reuse time elapsed.
    ReuseTooSoon,
    /// A helper action could not be synthesized.
    ReservedActionMissing,
}

/// One observable step in an action's life.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEvent {
    Queued {
        instance: InstanceId,
        action_id: ActionId,
    },
    Discarded {
        action_id: ActionId,
        reason: DiscardReason,
    },
    /// A helper was inserted ahead of `base`.
    Synthesized {
        instance: InstanceId,
        action_id: ActionId,
        base: ActionId,
    },
    /// `on_start` was invoked.
    Started {
        instance: InstanceId,
        action_id: ActionId,
        logic: ActionLogic,
        target: Option<EntityId>,
        amount: f32,
    },
    AbortedOnStart {
        instance: InstanceId,
        action_id: ActionId,
    },
    BecameNonBlocking {
        instance: InstanceId,
        action_id: ActionId,
    },
    Ended {
        instance: InstanceId,
        action_id: ActionId,
        chained: bool,
    },
    Cancelled {
        instance: InstanceId,
        action_id: ActionId,
    },
}

impl ActionEvent {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::Queued { action_id, .. }
            | Self::Discarded { action_id, .. }
            | Self::Synthesized { action_id, .. }
            | Self::Started { action_id, .. }
            | Self::AbortedOnStart { action_id, .. }
            | Self::BecameNonBlocking { action_id, .. }
            | Self::Ended { action_id, .. }
            | Self::Cancelled { action_id, .. } => *action_id,
        }
    }

    pub fn instance(&self) -> Option<InstanceId> {
        match self {
            Self::Discarded { .. } => None,
            Self::Queued { instance, .. }
            | Self::Synthesized { instance, .. }
            | Self::Started { instance, .. }
            | Self::AbortedOnStart { instance, .. }
            | Self::BecameNonBlocking { instance, .. }
            | Self::Ended { instance, .. }
            | Self::Cancelled { instance, .. } => Some(*instance),
        }
    }
}

/// Bounded ring of [`ActionEvent`]s; the oldest entry is dropped when full.
#[derive(Debug)]
pub(crate) struct EventJournal {
    events: VecDeque<ActionEvent>,
    capacity: usize,
}

impl EventJournal {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    pub fn record(&mut self, event: ActionEvent) {
        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<ActionEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discarded(id: u32) -> ActionEvent {
        ActionEvent::Discarded {
            action_id: ActionId(id),
            reason: DiscardReason::QueueFull,
        }
    }

    #[test]
    fn journal_drops_oldest_when_full() {
        let mut journal = EventJournal::new(2);
        journal.record(discarded(1));
        journal.record(discarded(2));
        journal.record(discarded(3));

        let ids: Vec<_> = journal.drain().iter().map(ActionEvent::action_id).collect();
        assert_eq!(ids, vec![ActionId(2), ActionId(3)]);
        assert!(journal.drain().is_empty());
    }

    #[test]
    fn zero_capacity_disables_recording() {
        let mut journal = EventJournal::new(0);
        journal.record(discarded(1));
        assert!(journal.drain().is_empty());
    }
}
