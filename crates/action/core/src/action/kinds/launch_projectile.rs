use crate::action::{ActionRequest, ProjectileInfo};
use crate::engine::context::HookContext;
use crate::env::ProjectileLaunch;

use super::ActionHooks;

/// Fires one projectile at the execution point, or on end if it has not fired yet.
#[derive(Debug, Default)]
pub(crate) struct LaunchProjectileAction {
    launched: bool,
}

impl LaunchProjectileAction {
    fn launch(&mut self, cx: &mut HookContext<'_>) {
        if self.launched {
            return;
        }
        self.launched = true;

        // higher request levels pick later entries, falling back to the last one
        let config = cx.config;
        let Some(info) = config
            .projectiles
            .get(cx.request.level as usize)
            .or_else(|| config.projectiles.last())
        else {
            tracing::warn!(action = %config.id, "no projectile configured, nothing launched");
            return;
        };
        fire_projectile(cx, info);
    }
}

/// Spawns `info` from the character along its facing, aimed at the first requested target.
pub(super) fn fire_projectile(cx: &mut HookContext<'_>, info: &ProjectileInfo) {
    let launch = ProjectileLaunch {
        owner: cx.character.entity_id(),
        origin: cx.character.position(),
        direction: cx.character.facing(),
        target: cx.request.first_target(),
        info,
    };
    cx.world.spawn_projectile(&launch);
}

impl ActionHooks for LaunchProjectileAction {
    fn on_start(&mut self, cx: &mut HookContext<'_>) -> bool {
        if let Some(direction) = cx.request.direction.filter(|d| !d.is_zero()) {
            cx.character.set_facing(direction);
        }
        cx.trigger_anim();
        true
    }

    fn on_update(&mut self, cx: &mut HookContext<'_>) -> bool {
        if !self.launched && cx.reached_exec_time() {
            self.launch(cx);
        }
        true
    }

    fn on_end(&mut self, cx: &mut HookContext<'_>) -> Option<ActionRequest> {
        self.launch(cx);
        None
    }

    fn on_cancel(&mut self, cx: &mut HookContext<'_>) {
        cx.trigger_anim2();
    }
}
