use crate::engine::context::HookContext;
use crate::types::EntityId;

use super::{ActionHooks, is_on_receiving_side};

/// Beam that cannot miss: damage lands once the computed flight time has elapsed.
///
/// The flight time is the execution point plus the distance to the aim point
/// over the first projectile's speed. With no valid target the beam still
/// plays toward the requested position but hurts nobody.
#[derive(Debug, Default)]
pub(crate) struct RangedFxTargetedAction {
    target: Option<EntityId>,
    impact_after: f32,
    impacted: bool,
}

impl ActionHooks for RangedFxTargetedAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        let Some(info) = cx.config.projectiles.first() else {
            tracing::warn!(action = %cx.config.id, "no projectile configured for beam");
            return false;
        };
        let speed = info.speed;

        self.target = cx
            .request
            .first_target()
            .filter(|&target| cx.world.is_spawned(target) && is_on_receiving_side(cx, target));
        let Some(aim) = self
            .target
            .and_then(|target| cx.world.position_of(target))
            .or(cx.request.position)
        else {
            tracing::debug!(action = %cx.config.id, "beam has nothing to aim at");
            return false;
        };

        cx.character.look_at(aim);
        let distance = (aim - cx.character.position()).length();
        let flight = if speed > 0.0 { distance / speed } else { 0.0 };
        self.impact_after = cx.config.exec_time_seconds + flight;
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if !self.impacted && cx.time_running() >= self.impact_after {
            self.impacted = true;
            if let Some(target) = self.target.filter(|&target| cx.world.is_spawned(target)) {
                let damage = cx.config.projectiles.first().map_or(0, |info| info.damage);
                let attacker = cx.character.entity_id();
                cx.world.apply_hp(attacker, target, -damage);
            }
        }
        true
    }
}
