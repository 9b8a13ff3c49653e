use crate::engine::context::HookContext;

use super::ActionHooks;

/// Plays an animation for the configured duration.
#[derive(Debug, Default)]
pub(crate) struct EmoteAction;

impl ActionHooks for EmoteAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, _cx: &mut HookContext<'_>) -> bool {
        true
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        cx.trigger_anim2();
    }
}
