use crate::engine::context::HookContext;
use crate::types::EntityId;

use super::{ActionHooks, face_entity, ideal_melee_foe};

/// Single strike that lands at the execution point.
#[derive(Debug, Default)]
pub(crate) struct MeleeAction {
    executed: bool,
    provisional_target: Option<EntityId>,
}

impl MeleeAction {
    fn detect_foe(cx: &HookContext<'_>, preferred: Option<EntityId>) -> Option<EntityId> {
        ideal_melee_foe(cx, cx.character.position(), cx.config.range, preferred)
    }
}

impl ActionHooks for MeleeAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        let preferred = cx.preferred_target();
        self.provisional_target = Self::detect_foe(cx, preferred);

        if let Some(direction) = cx.request.direction.filter(|d| !d.is_zero()) {
            cx.character.set_facing(direction);
        } else if let Some(foe) = self.provisional_target {
            face_entity(cx, foe);
        }
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if !self.executed && cx.reached_exec_time() {
            self.executed = true;
            // the foe may have stepped away during the wind-up
            if let Some(foe) = Self::detect_foe(cx, self.provisional_target) {
                let attacker = cx.character.entity_id();
                cx.world.apply_hp(attacker, foe, -cx.config.amount);
            }
        }
        true
    }
}
