use crate::action::GameplayActivity;
use crate::engine::context::{HookContext, InstanceView};

use super::ActionHooks;

/// Turns the character invisible at the execution point until it attacks or is hit.
#[derive(Debug, Default)]
pub(crate) struct StealthModeAction {
    stealth_started: bool,
    stealth_ended: bool,
}

impl StealthModeAction {
    fn end_stealth(&mut self, cx: &mut HookContext<'_>) {
        if !self.stealth_ended {
            self.stealth_ended = true;
            if self.stealth_started {
                cx.character.set_stealthy(false);
            }
        }
    }
}

impl ActionHooks for StealthModeAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if !self.stealth_started && !self.stealth_ended && cx.reached_exec_time() {
            self.stealth_started = true;
            cx.character.set_stealthy(true);
        }
        !self.stealth_ended
    }

    fn should_become_non_blocking(&self, view: &InstanceView<'_>) -> bool {
        view.reached_exec_time()
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        cx.trigger_anim2();
        self.end_stealth(cx);
    }

    fn on_gameplay_activity(&mut self, cx: &mut HookContext<'_>, activity: GameplayActivity) {
        if matches!(
            activity,
            GameplayActivity::UsingAttackAction | GameplayActivity::AttackedByEnemy
        ) {
            self.end_stealth(cx);
        }
    }
}
