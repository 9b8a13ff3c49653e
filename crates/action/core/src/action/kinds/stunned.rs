use crate::action::BuffableValue;
use crate::engine::context::{HookContext, InstanceView};

use super::ActionHooks;

/// Helpless state: the character takes `amount` times the usual damage.
#[derive(Debug, Default)]
pub(crate) struct StunnedAction;

impl ActionHooks for StunnedAction {
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

    fn buff_value(&self, view: &InstanceView<'_>, kind: BuffableValue, value: &mut f32) {
        if kind == BuffableValue::PercentDamageReceived {
            *value *= view.config.amount as f32;
        }
    }
}
