use crate::engine::context::HookContext;
use crate::types::Vec3;

use super::{ActionHooks, is_on_receiving_side};

/// Slack allowed between the requested point and `range` before the request is refused.
const MAX_DISTANCE_DIVERGENCE: f32 = 1.0;

/// Area strike on the requested point, landing once at the execution point.
///
/// Every living foe within `radius` of the point takes `amount` damage.
#[derive(Debug, Default)]
pub(crate) struct AoeAction {
    center: Vec3,
    struck: bool,
}

impl ActionHooks for AoeAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        let Some(center) = cx.request.position else {
            tracing::debug!(action = %cx.config.id, "area strike without a position");
            return false;
        };
        let distance = (center - cx.character.position()).length();
        if distance > cx.config.range + MAX_DISTANCE_DIVERGENCE {
            tracing::debug!(
                action = %cx.config.id,
                distance,
                range = cx.config.range,
                "area strike requested out of range"
            );
            return false;
        }

        self.center = center;
        // the strike picks its own victims
        cx.request.target_ids.clear();
        cx.character.look_at(center);
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if !self.struck && cx.reached_exec_time() {
            self.struck = true;
            let attacker = cx.character.entity_id();
            for victim in cx.world.entities_within(self.center, cx.config.radius) {
                if victim == attacker || !is_on_receiving_side(cx, victim) {
                    continue;
                }
                if cx.world.life_state(victim).is_some_and(|state| state.is_alive()) {
                    cx.world.apply_hp(attacker, victim, -cx.config.amount);
                }
            }
        }
        true
    }
}
