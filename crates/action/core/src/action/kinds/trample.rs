use crate::action::{ActionRequest, BuffableValue};
use crate::engine::context::HookContext;
use crate::types::EntityId;

use super::{ActionHooks, face_entity};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum TrampleStage {
    /// Animating before moving.
    #[default]
    Windup,
    /// Charging forward and hitting whoever is in the way.
    Charging,
    Complete,
}

/// Forward charge that damages and knocks back the characters it runs into.
///
/// Running into a victim with a positive chance to stun tramplers can stop the
/// charge; the trampler then chains into the reserved stunned action.
#[derive(Debug, Default)]
pub(crate) struct TrampleAction {
    previous_stage: TrampleStage,
    collided: Vec<EntityId>,
    was_stunned: bool,
}

impl TrampleAction {
    fn current_stage(cx: &HookContext<'_>) -> TrampleStage {
        let elapsed = cx.time_running();
        if elapsed < cx.config.exec_time_seconds {
            TrampleStage::Windup
        } else if elapsed < cx.config.duration_seconds {
            TrampleStage::Charging
        } else {
            TrampleStage::Complete
        }
    }

    fn collide_with_victim(&mut self, cx: &mut HookContext<'_>, victim: EntityId) {
        let attacker = cx.character.entity_id();
        if victim == attacker || self.was_stunned {
            return;
        }

        if cx.world.is_npc(victim) != Some(cx.character.is_npc()) {
            let chance_to_stun = cx
                .world
                .buffed_value(victim, BuffableValue::ChanceToStunTramplers)
                .unwrap_or(0.0);
            if chance_to_stun > 0.0 && cx.world.roll_unit() < chance_to_stun {
                self.stun_self(cx);
                return;
            }

            let damage = if cx.request.first_target() == Some(victim) {
                cx.config.amount
            } else {
                cx.config.splash_damage
            };
            cx.world.apply_hp(attacker, victim, -damage);
        }

        let origin = cx.character.position();
        cx.world.start_knockback(
            victim,
            origin,
            cx.config.knockback_speed,
            cx.config.knockback_duration,
        );
    }

    fn stun_self(&mut self, cx: &mut HookContext<'_>) {
        if !self.was_stunned
            && let Some(movement) = cx.character.movement()
        {
            movement.cancel_move();
        }
        self.was_stunned = true;
        tracing::debug!(action = %cx.config.id, "trample stopped by a stun");
    }
}

impl ActionHooks for TrampleAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        self.previous_stage = TrampleStage::Windup;
        if let Some(target) = cx.request.first_target() {
            face_entity(cx, target);
        }
        cx.character.reset_animation(cx.config.anim2.as_deref());
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        let stage = Self::current_stage(cx);
        if stage != self.previous_stage && stage == TrampleStage::Charging {
            let speed = cx.config.move_speed;
            let duration = cx.config.duration_seconds - cx.config.exec_time_seconds;
            if let Some(movement) = cx.character.movement() {
                movement.start_forward_charge(speed, duration);
            }
        }
        self.previous_stage = stage;
        stage != TrampleStage::Complete && !self.was_stunned
    }

    fn on_end(&mut self, cx: &mut HookContext<'_>) -> Option<ActionRequest> {
        self.on_cancel(cx);
        self.was_stunned
            .then(|| ActionRequest::new(cx.reserved.stunned).queued(false))
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        cx.trigger_anim2();
    }

    fn collision_entered(&mut self, cx: &mut HookContext<'_>, other: EntityId) {
        if Self::current_stage(cx) != TrampleStage::Charging || self.collided.contains(&other) {
            return;
        }
        self.collided.push(other);
        self.collide_with_victim(cx, other);
    }
}
