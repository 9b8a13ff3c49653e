use crate::action::GameplayActivity;
use crate::engine::context::HookContext;

use super::launch_projectile::fire_projectile;
use super::{ActionHooks, face_entity};

/// Projectile that charges while held and fires on release.
///
/// Charge builds up to the execution point. Letting go, ending, or being
/// cancelled fires the projectile whose index matches the charge reached, so a
/// full charge picks the last entry. A hit while charging fizzles the shot.
#[derive(Debug, Default)]
pub(crate) struct ChargedLaunchProjectileAction {
    stopped_charging_at: Option<f32>,
    hit_by_attack: bool,
}

impl ChargedLaunchProjectileAction {
    fn is_charging(&self) -> bool {
        self.stopped_charging_at.is_none()
    }

    fn percent_charged_up(cx: &HookContext<'_>) -> f32 {
        let exec = cx.config.exec_time_seconds;
        if exec <= 0.0 {
            return 1.0;
        }
        (cx.time_running() / exec).clamp(0.0, 1.0)
    }

    fn stop_charging_up(&mut self, cx: &mut HookContext<'_>) {
        if !self.is_charging() {
            return;
        }
        self.stopped_charging_at = Some(cx.now);
        cx.trigger_anim2();
        if self.hit_by_attack {
            tracing::debug!(action = %cx.config.id, "charge broken by a hit, nothing launched");
            return;
        }

        let config = cx.config;
        let last = config.projectiles.len().saturating_sub(1);
        let index = (Self::percent_charged_up(cx) * last as f32) as usize;
        match config.projectiles.get(index) {
            Some(info) => fire_projectile(cx, info),
            None => {
                tracing::warn!(action = %config.id, "no projectile configured, nothing launched")
            }
        }
    }
}

impl ActionHooks for ChargedLaunchProjectileAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        if let Some(target) = cx.request.first_target() {
            face_entity(cx, target);
        }
        if cx.config.projectiles.len() < 2 {
            tracing::warn!(
                action = %cx.config.id,
                "charged launch has fewer than two projectile levels"
            );
        }
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if self.is_charging() && Self::percent_charged_up(cx) >= 1.0 {
            self.stop_charging_up(cx);
        }
        self.is_charging()
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        self.stop_charging_up(cx);
    }

    fn on_gameplay_activity(&mut self, cx: &mut HookContext<'_>, activity: GameplayActivity) {
        match activity {
            GameplayActivity::AttackedByEnemy => {
                self.hit_by_attack = true;
                self.stop_charging_up(cx);
            }
            GameplayActivity::StoppedChargingUp => self.stop_charging_up(cx),
            _ => {}
        }
    }
}
