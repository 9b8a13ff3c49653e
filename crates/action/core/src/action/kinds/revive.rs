use crate::engine::context::HookContext;
use crate::types::LifeState;

use super::{ActionHooks, face_entity};

/// Brings a fainted ally back at the execution point.
#[derive(Debug, Default)]
pub(crate) struct ReviveAction {
    executed: bool,
}

impl ActionHooks for ReviveAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        let Some(target) = cx.request.first_target().filter(|&t| cx.world.is_spawned(t)) else {
            tracing::debug!(action = %cx.config.id, "revive target missing or despawned");
            return false;
        };
        face_entity(cx, target);
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if !self.executed && cx.reached_exec_time() {
            self.executed = true;
            let Some(target) = cx.request.first_target() else {
                return false;
            };
            if cx.world.life_state(target) == Some(LifeState::Fainted) {
                debug_assert!(cx.config.amount > 0, "revive amount must be positive");
                let reviver = cx.character.entity_id();
                cx.world.revive(reviver, target, cx.config.amount);
            } else {
                self.on_cancel(cx);
                return false;
            }
        }
        true
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        cx.trigger_anim2();
    }
}
