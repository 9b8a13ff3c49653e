use crate::action::{ActionRequest, BuffableValue};
use crate::engine::context::{HookContext, InstanceView};
use crate::types::Vec3;

use super::{ActionHooks, ideal_melee_foe};

/// Dash to a point, invulnerable after the execution point, striking on arrival.
#[derive(Debug, Default)]
pub(crate) struct DashAttackAction {
    destination: Vec3,
}

impl DashAttackAction {
    /// Requested position clamped to `range`, or straight ahead when none was given.
    fn dash_destination(cx: &HookContext<'_>) -> Vec3 {
        let origin = cx.character.position();
        let range = cx.config.range;
        let Some(requested) = cx.request.position else {
            return origin + cx.character.facing().normalized() * range;
        };
        let offset = requested - origin;
        if offset.length_squared() > range * range {
            origin + offset.normalized() * range
        } else {
            requested
        }
    }
}

impl ActionHooks for DashAttackAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        self.destination = Self::dash_destination(cx);
        cx.character.look_at(self.destination);
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, _cx: &mut HookContext<'_>) -> bool {
        true
    }

    fn on_end(&mut self, cx: &mut HookContext<'_>) -> Option<ActionRequest> {
        cx.trigger_anim2();
        if let Some(movement) = cx.character.movement() {
            movement.teleport(self.destination);
        }

        let preferred = cx.request.first_target();
        if let Some(foe) = ideal_melee_foe(cx, self.destination, cx.config.radius, preferred) {
            let attacker = cx.character.entity_id();
            cx.world.apply_hp(attacker, foe, -cx.config.amount);
        }
        None
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        cx.character.reset_animation(cx.config.anim.as_deref());
    }

    fn buff_value(&self, view: &InstanceView<'_>, kind: BuffableValue, value: &mut f32) {
        if kind == BuffableValue::PercentDamageReceived && view.reached_exec_time() {
            *value = 0.0;
        }
    }
}
