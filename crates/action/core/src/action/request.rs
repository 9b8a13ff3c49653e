//! Requests submitted to the action player.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::EngineConfig;
use crate::types::{EntityId, Vec3};

use super::kind::ActionId;

bitflags! {
    /// Scheduling hints carried by a request.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RequestFlags: u8 {
        /// Wait behind the current queue instead of preempting it.
        const SHOULD_QUEUE    = 1 << 0;
        /// Move into range of the target before running.
        const SHOULD_CLOSE    = 1 << 1;
        const CANCEL_MOVEMENT = 1 << 2;
    }
}

/// Bounded, ordered list of targets.
pub type TargetIds = ArrayVec<EntityId, { EngineConfig::MAX_TARGETS }>;

/// A "perform this action" request for one character.
///
/// Targets and positions are expected to be resolved by the input layer before
/// the request reaches the player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub action_id: ActionId,
    pub target_ids: TargetIds,
    pub position: Option<Vec3>,
    pub direction: Option<Vec3>,
    pub amount: f32,
    pub level: u8,
    pub flags: RequestFlags,
}

impl ActionRequest {
    pub fn new(action_id: ActionId) -> Self {
        Self {
            action_id,
            target_ids: TargetIds::new(),
            position: None,
            direction: None,
            amount: 0.0,
            level: 0,
            flags: RequestFlags::empty(),
        }
    }

    /// Adds a target. Targets beyond [`EngineConfig::MAX_TARGETS`] are dropped.
    #[must_use]
    pub fn with_target(mut self, target: EntityId) -> Self {
        if self.target_ids.try_push(target).is_err() {
            tracing::trace!(action = %self.action_id, %target, "target list full, dropping target");
        }
        self
    }

    #[must_use]
    pub fn with_targets(self, targets: impl IntoIterator<Item = EntityId>) -> Self {
        targets.into_iter().fold(self, Self::with_target)
    }

    #[must_use]
    pub fn at_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn toward(mut self, direction: Vec3) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: f32) -> Self {
        self.amount = amount;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn queued(mut self, should_queue: bool) -> Self {
        self.flags.set(RequestFlags::SHOULD_QUEUE, should_queue);
        self
    }

    #[must_use]
    pub fn closing(mut self, should_close: bool) -> Self {
        self.flags.set(RequestFlags::SHOULD_CLOSE, should_close);
        self
    }

    #[must_use]
    pub fn cancelling_movement(mut self, cancel_movement: bool) -> Self {
        self.flags.set(RequestFlags::CANCEL_MOVEMENT, cancel_movement);
        self
    }

    pub fn should_queue(&self) -> bool {
        self.flags.contains(RequestFlags::SHOULD_QUEUE)
    }

    pub fn should_close(&self) -> bool {
        self.flags.contains(RequestFlags::SHOULD_CLOSE)
    }

    pub fn cancel_movement(&self) -> bool {
        self.flags.contains(RequestFlags::CANCEL_MOVEMENT)
    }

    pub fn set_should_close(&mut self, should_close: bool) {
        self.flags.set(RequestFlags::SHOULD_CLOSE, should_close);
    }

    pub fn first_target(&self) -> Option<EntityId> {
        self.target_ids.first().copied()
    }

    /// Functional equality: same action on the same targets with the same
    /// payload, regardless of scheduling flags.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.action_id == other.action_id
            && self.target_ids == other.target_ids
            && self.position == other.position
            && self.direction == other.direction
            && self.amount == other.amount
            && self.level == other.level
    }

    /// Forces `level` to zero unless the request came from an NPC.
    ///
    /// Human-originated requests are not trusted to pick their own level.
    pub fn sanitize_level(&mut self, is_npc: bool) {
        if !is_npc {
            self.level = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_toggle_independently() {
        let mut request = ActionRequest::new(ActionId(4)).queued(true).closing(true);
        assert!(request.should_queue());
        assert!(request.should_close());
        assert!(!request.cancel_movement());

        request.set_should_close(false);
        assert!(request.should_queue());
        assert!(!request.should_close());
    }

    #[test]
    fn equivalence_ignores_scheduling_flags() {
        let a = ActionRequest::new(ActionId(4)).with_target(EntityId(9)).queued(true);
        let b = ActionRequest::new(ActionId(4)).with_target(EntityId(9)).closing(true);
        let c = ActionRequest::new(ActionId(4)).with_target(EntityId(10));

        assert!(a.is_equivalent(&b));
        assert_ne!(a, b);
        assert!(!a.is_equivalent(&c));
    }

    #[test]
    fn extra_targets_are_dropped() {
        let request = ActionRequest::new(ActionId(1)).with_targets((0..10).map(EntityId));
        assert_eq!(request.target_ids.len(), EngineConfig::MAX_TARGETS);
        assert_eq!(request.first_target(), Some(EntityId(0)));
    }

    #[test]
    fn level_is_cleared_for_humans_only() {
        let mut human = ActionRequest::new(ActionId(1)).with_level(3);
        human.sanitize_level(false);
        assert_eq!(human.level, 0);

        let mut npc = ActionRequest::new(ActionId(1)).with_level(3);
        npc.sanitize_level(true);
        assert_eq!(npc.level, 3);
    }
}
