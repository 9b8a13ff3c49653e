//! Interfaces into the character an action player drives.
//!
//! Every accessor that can be missing returns an `Option`. Hooks treat a
//! missing collaborator as "skip the side effect" and carry on with their own
//! state machine.

use crate::types::{EntityId, Vec3};

/// Navigation and physics control for one character.
pub trait MovementController {
    /// Stops any path following or voluntary movement.
    fn cancel_move(&mut self);

    /// Knockbacks, charges and other movement the character does not control.
    fn is_performing_forced_movement(&self) -> bool;

    fn is_moving(&self) -> bool;

    /// Starts (or keeps) following `target`.
    fn follow(&mut self, target: EntityId);

    fn teleport(&mut self, position: Vec3);

    /// Forced straight-line charge along the current facing.
    fn start_forward_charge(&mut self, speed: f32, duration: f32);
}

/// Fire-and-forget animation triggers.
pub trait AnimationSink {
    fn set_trigger(&mut self, name: &str);
    fn reset_trigger(&mut self, name: &str);
}

/// The character that owns an action player.
pub trait ServerCharacter {
    fn entity_id(&self) -> EntityId;

    /// NPC requests are trusted; human requests are sanitized by the caller.
    fn is_npc(&self) -> bool;

    fn position(&self) -> Vec3;

    fn facing(&self) -> Vec3;

    fn set_facing(&mut self, direction: Vec3);

    /// Currently tracked target, used by target synthesis.
    fn target_id(&self) -> Option<EntityId>;

    fn set_target_id(&mut self, target: Option<EntityId>);

    fn set_stealthy(&mut self, _stealthy: bool) {}

    fn movement(&mut self) -> Option<&mut dyn MovementController>;

    fn animator(&mut self) -> Option<&mut dyn AnimationSink> {
        None
    }

    /// Turns toward `point`. A point at the character's own position leaves facing unchanged.
    fn look_at(&mut self, point: Vec3) {
        let direction = (point - self.position()).normalized();
        if !direction.is_zero() {
            self.set_facing(direction);
        }
    }

    fn is_under_forced_movement(&mut self) -> bool {
        self.movement()
            .is_some_and(|movement| movement.is_performing_forced_movement())
    }

    /// Cancels voluntary movement unless the character is being moved by force.
    fn cancel_move_unless_forced(&mut self) {
        if let Some(movement) = self.movement()
            && !movement.is_performing_forced_movement()
        {
            movement.cancel_move();
        }
    }

    fn trigger_animation(&mut self, name: Option<&str>) {
        if let (Some(name), Some(animator)) = (name, self.animator()) {
            animator.set_trigger(name);
        }
    }

    fn reset_animation(&mut self, name: Option<&str>) {
        if let (Some(name), Some(animator)) = (name, self.animator()) {
            animator.reset_trigger(name);
        }
    }
}
