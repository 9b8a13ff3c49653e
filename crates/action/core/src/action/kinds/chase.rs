use crate::engine::context::HookContext;

use super::ActionHooks;

/// Follows the first target until within `request.amount` of it.
///
/// Synthesized chases carry the base action's range in `amount`.
#[derive(Debug, Default)]
pub(crate) struct ChaseAction;

impl ChaseAction {
    /// Returns true (after stopping movement) once there is nothing left to chase.
    fn stop_if_done(&self, cx: &mut HookContext<'_>) -> bool {
        let Some(target) = cx.request.first_target() else {
            return true;
        };
        let Some(target_position) = cx.world.position_of(target) else {
            self.stop(cx);
            return true;
        };

        let range = cx.request.amount;
        if cx.character.position().distance_squared(target_position) < range * range {
            self.stop(cx);
            return true;
        }
        false
    }

    fn stop(&self, cx: &mut HookContext<'_>) {
        cx.character.cancel_move_unless_forced();
    }

    fn follow(&self, cx: &mut HookContext<'_>) {
        let Some(target) = cx.request.first_target() else {
            return;
        };
        if let Some(movement) = cx.character.movement()
            && !movement.is_performing_forced_movement()
        {
            movement.follow(target);
        }
    }
}

impl ActionHooks for ChaseAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        let Some(target) = cx.request.first_target() else {
            tracing::debug!(action = %cx.config.id, "chase started without a target");
            return false;
        };
        // friend or foe, alive or not: only a despawned target ends the chase
        if !cx.world.is_spawned(target) {
            tracing::debug!(action = %cx.config.id, %target, "chase target has despawned");
            return false;
        }

        if self.stop_if_done(cx) {
            if let Some(position) = cx.world.position_of(target) {
                cx.character.look_at(position);
            }
            return false;
        }

        self.follow(cx);
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if self.stop_if_done(cx) {
            return false;
        }
        self.follow(cx);
        true
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        self.stop(cx);
    }
}
