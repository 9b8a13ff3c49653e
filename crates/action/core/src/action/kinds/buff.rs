use crate::action::BuffableValue;
use crate::engine::context::{HookContext, InstanceView};

use super::ActionHooks;

/// Applies the config's [`crate::action::BuffEffect`] while running.
#[derive(Debug, Default)]
pub(crate) struct BuffAction;

impl ActionHooks for BuffAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        if cx.config.buff.is_none() {
            tracing::warn!(action = %cx.config.id, "buff action has no effect configured");
            return false;
        }
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, _cx: &mut HookContext<'_>) -> bool {
        true
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        cx.trigger_anim2();
    }

    fn buff_value(&self, view: &InstanceView<'_>, kind: BuffableValue, value: &mut f32) {
        if let Some(effect) = view.config.buff
            && effect.value == kind
        {
            *value = effect.modifier.apply(*value);
        }
    }
}
