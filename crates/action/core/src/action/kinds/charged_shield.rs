use crate::action::{BuffableValue, GameplayActivity};
use crate::engine::context::{HookContext, InstanceView};

use super::{ActionHooks, face_entity};

/// Shield that charges up while held and lingers after release.
///
/// Charging lasts until the execution point, or until the character is hit or
/// lets go. The shield then runs in the background for the effect duration.
/// Damage reduction grows from 50% (uncharged) to 100% (fully charged), and a
/// fully charged shield stuns anyone who tramples into it.
#[derive(Debug, Default)]
pub(crate) struct ChargedShieldAction {
    stopped_charging_at: Option<f32>,
}

impl ChargedShieldAction {
    fn is_charging(&self) -> bool {
        self.stopped_charging_at.is_none()
    }

    fn stop_charging_up(&mut self, cx: &mut HookContext<'_>) {
        if self.is_charging() {
            self.stopped_charging_at = Some(cx.now);
            cx.trigger_anim2();
        }
    }

    fn percent_charged_up(&self, view: &InstanceView<'_>) -> f32 {
        let exec = view.config.exec_time_seconds;
        if exec <= 0.0 {
            return 1.0;
        }
        let charge_time = match (self.stopped_charging_at, view.time_started) {
            (Some(stopped), Some(started)) => stopped - started,
            _ => view.time_running(),
        };
        (charge_time / exec).clamp(0.0, 1.0)
    }
}

impl ActionHooks for ChargedShieldAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        if let Some(target) = cx.request.first_target() {
            face_entity(cx, target);
        }
        cx.character.reset_animation(cx.config.anim2.as_deref());
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if self.is_charging() && cx.reached_exec_time() {
            self.stop_charging_up(cx);
        }
        match self.stopped_charging_at {
            None => true,
            Some(stopped) => cx.now < stopped + cx.config.effect_duration_seconds,
        }
    }

    fn should_become_non_blocking(&self, _view: &InstanceView<'_>) -> bool {
        !self.is_charging()
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        self.stop_charging_up(cx);
    }

    fn buff_value(&self, view: &InstanceView<'_>, kind: BuffableValue, value: &mut f32) {
        match kind {
            BuffableValue::PercentDamageReceived => {
                let charged = self.percent_charged_up(view);
                let reduction = 0.5 + (charged * charged) / 2.0;
                *value *= 1.0 - reduction;
            }
            BuffableValue::ChanceToStunTramplers => {
                if self.percent_charged_up(view) >= 1.0 {
                    *value = 1.0;
                }
            }
            BuffableValue::PercentHealingReceived => {}
        }
    }

    fn on_gameplay_activity(&mut self, cx: &mut HookContext<'_>, activity: GameplayActivity) {
        if matches!(
            activity,
            GameplayActivity::AttackedByEnemy | GameplayActivity::StoppedChargingUp
        ) {
            self.stop_charging_up(cx);
        }
    }
}
