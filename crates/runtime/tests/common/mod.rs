//! Shared catalog and runtime setup for the runtime integration tests.
#![allow(dead_code)]

use action_core::{
    ActionCatalog, ActionConfig, ActionId, ActionLogic, BlockingMode, BuffEffect, BuffModifier,
    BuffableValue, EntityId, ProjectileInfo, ReservedActions,
};
use action_runtime::{Event, Runtime, RuntimeConfig};
use tokio::sync::broadcast;

pub const TARGET: ActionId = ActionId(1);
pub const CHASE: ActionId = ActionId(2);
pub const STUNNED: ActionId = ActionId(3);
pub const SWING: ActionId = ActionId(10);
pub const WAVE: ActionId = ActionId(11);
pub const RALLY: ActionId = ActionId(13);
pub const TRAMPLE: ActionId = ActionId(14);
pub const STEALTH: ActionId = ActionId(17);
pub const REVIVE: ActionId = ActionId(18);
pub const ARROW: ActionId = ActionId(19);
pub const BRACE: ActionId = ActionId(20);
pub const MEND: ActionId = ActionId(21);
pub const BLESSING: ActionId = ActionId(22);

pub const HERO: EntityId = EntityId(1);
pub const HEALER: EntityId = EntityId(2);
pub const GRUNT: EntityId = EntityId(10);
pub const BRUTE: EntityId = EntityId(11);

pub fn test_catalog() -> ActionCatalog {
    let reserved = ReservedActions::new(TARGET, CHASE, STUNNED);
    let configs = vec![
        ActionConfig::new(TARGET, "general_target", ActionLogic::Target)
            .with_blocking_mode(BlockingMode::OnlyDuringExecTime),
        ActionConfig::new(CHASE, "general_chase", ActionLogic::Chase),
        ActionConfig::new(STUNNED, "stunned", ActionLogic::Stunned)
            .with_timing(1.0, 0.0)
            .with_amount(2),
        ActionConfig::new(SWING, "swing", ActionLogic::Melee)
            .with_timing(1.0, 0.5)
            .with_amount(5)
            .with_range(2.0),
        ActionConfig::new(WAVE, "wave", ActionLogic::Emote)
            .with_timing(0.5, 0.0)
            .interruptible(true),
        ActionConfig {
            is_friendly: true,
            ..ActionConfig::new(RALLY, "rally", ActionLogic::Buff)
                .with_timing(5.0, 0.0)
                .with_blocking_mode(BlockingMode::OnlyDuringExecTime)
                .with_buff(BuffEffect::new(
                    BuffableValue::PercentDamageReceived,
                    BuffModifier::Flat(1.0),
                ))
        },
        ActionConfig {
            is_friendly: true,
            ..ActionConfig::new(BRACE, "brace", ActionLogic::Buff)
                .with_timing(5.0, 0.0)
                .with_blocking_mode(BlockingMode::OnlyDuringExecTime)
                .with_buff(BuffEffect::new(
                    BuffableValue::ChanceToStunTramplers,
                    BuffModifier::Set(1.0),
                ))
        },
        // friendly strike with a negative amount heals whoever it lands on
        ActionConfig {
            is_friendly: true,
            ..ActionConfig::new(MEND, "mend", ActionLogic::Melee)
                .with_timing(1.0, 0.5)
                .with_amount(-10)
                .with_range(2.0)
        },
        ActionConfig {
            is_friendly: true,
            ..ActionConfig::new(BLESSING, "blessing", ActionLogic::Buff)
                .with_timing(5.0, 0.0)
                .with_blocking_mode(BlockingMode::OnlyDuringExecTime)
                .with_buff(BuffEffect::new(
                    BuffableValue::PercentHealingReceived,
                    BuffModifier::Set(f32::MAX),
                ))
        },
        ActionConfig {
            move_speed: 6.0,
            knockback_speed: 4.0,
            knockback_duration: 0.5,
            ..ActionConfig::new(TRAMPLE, "trample", ActionLogic::Trample)
                .with_timing(1.0, 0.25)
                .with_amount(7)
        },
        ActionConfig::new(STEALTH, "stealth", ActionLogic::StealthMode).with_timing(0.0, 0.5),
        ActionConfig {
            is_friendly: true,
            ..ActionConfig::new(REVIVE, "revive", ActionLogic::Revive)
                .with_timing(1.0, 0.5)
                .with_amount(30)
                .with_range(2.0)
        },
        ActionConfig::new(ARROW, "arrow", ActionLogic::LaunchProjectile)
            .with_timing(0.5, 0.25)
            .with_projectile(ProjectileInfo {
                prefab: "arrow".to_owned(),
                speed: 10.0,
                range: 10.0,
                damage: 4,
                max_victims: 1,
            }),
    ];
    ActionCatalog::from_configs(reserved, configs).expect("test catalog is valid")
}

/// 10 Hz runtime that only advances through `step`.
pub async fn manual_runtime() -> Runtime {
    Runtime::builder()
        .config(RuntimeConfig {
            tick_rate_hz: 10.0,
            event_buffer_size: 512,
            ..RuntimeConfig::default()
        })
        .manual_ticks()
        .catalog(test_catalog())
        .build()
        .await
        .expect("runtime builds")
}

/// Everything currently buffered on a receiver.
pub fn drain(receiver: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
