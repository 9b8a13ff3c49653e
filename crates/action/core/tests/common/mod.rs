//! Recording fakes shared by the player integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use action_core::{
    ActionCatalog, ActionConfig, ActionContext, ActionEvent, ActionId, ActionLogic, ActionPlayer,
    ActionRequest, AnimationSink, BlockingMode, BuffEffect, BuffModifier, BuffableValue,
    EngineConfig, EntityId, GameplayActivity, LifeState, MovementController, PlayOutcome,
    ProjectileInfo, ProjectileLaunch, ReservedActions, ServerCharacter, Vec3, World,
};

pub const TARGET: ActionId = ActionId(1);
pub const CHASE: ActionId = ActionId(2);
pub const STUNNED: ActionId = ActionId(3);
pub const SWING: ActionId = ActionId(10);
pub const WAVE: ActionId = ActionId(11);
pub const HEAVY_SWING: ActionId = ActionId(12);
pub const RALLY: ActionId = ActionId(13);
pub const TRAMPLE: ActionId = ActionId(14);
pub const BOW: ActionId = ActionId(15);
pub const SHIELD: ActionId = ActionId(16);
pub const STEALTH: ActionId = ActionId(17);
pub const REVIVE: ActionId = ActionId(18);
pub const ARROW: ActionId = ActionId(19);
pub const BLAST: ActionId = ActionId(20);
pub const BEAM: ActionId = ActionId(21);
pub const CHARGED_BOLT: ActionId = ActionId(22);

pub const PLAYER: EntityId = EntityId(1);

pub fn test_catalog() -> ActionCatalog {
    let reserved = ReservedActions::new(TARGET, CHASE, STUNNED);
    let configs = vec![
        ActionConfig::new(TARGET, "general_target", ActionLogic::Target)
            .with_blocking_mode(BlockingMode::OnlyDuringExecTime),
        ActionConfig::new(CHASE, "general_chase", ActionLogic::Chase),
        ActionConfig::new(STUNNED, "stunned", ActionLogic::Stunned)
            .with_timing(1.0, 0.0)
            .with_amount(2)
            .with_anims(Some("stunned"), Some("stunned_end")),
        ActionConfig::new(SWING, "swing", ActionLogic::Melee)
            .with_timing(1.0, 0.5)
            .with_amount(5)
            .with_range(2.0)
            .with_anims(Some("swing"), None),
        ActionConfig::new(WAVE, "wave", ActionLogic::Emote)
            .with_timing(0.5, 0.0)
            .interruptible(true)
            .with_anims(Some("wave"), Some("wave_end")),
        ActionConfig::new(HEAVY_SWING, "heavy_swing", ActionLogic::Melee)
            .with_timing(1.0, 0.5)
            .with_amount(12)
            .with_range(2.0)
            .with_reuse_time(3.0),
        ActionConfig::new(RALLY, "rally", ActionLogic::Buff)
            .with_timing(5.0, 0.0)
            .with_blocking_mode(BlockingMode::OnlyDuringExecTime)
            .with_buff(BuffEffect::new(
                BuffableValue::PercentDamageReceived,
                BuffModifier::Flat(1.0),
            )),
        ActionConfig {
            splash_damage: 3,
            move_speed: 6.0,
            knockback_speed: 4.0,
            knockback_duration: 0.5,
            ..ActionConfig::new(TRAMPLE, "trample", ActionLogic::Trample)
                .with_timing(1.0, 0.25)
                .with_amount(7)
                .with_anims(Some("trample"), Some("trample_end"))
        },
        ActionConfig::new(BOW, "bow", ActionLogic::Emote).with_timing(1.0, 0.0),
        ActionConfig::new(SHIELD, "shield", ActionLogic::ChargedShield)
            .with_timing(0.0, 1.0)
            .with_effect_duration(2.0)
            .with_interruptible_by([WAVE]),
        ActionConfig::new(STEALTH, "stealth", ActionLogic::StealthMode).with_timing(0.0, 0.5),
        ActionConfig::new(REVIVE, "revive", ActionLogic::Revive)
            .with_timing(1.0, 0.5)
            .with_amount(30)
            .with_range(2.0),
        ActionConfig::new(ARROW, "arrow", ActionLogic::LaunchProjectile)
            .with_timing(0.5, 0.25)
            .with_projectile(ProjectileInfo {
                prefab: "arrow".to_owned(),
                damage: 4,
                ..ProjectileInfo::default()
            }),
        ActionConfig {
            radius: 2.0,
            ..ActionConfig::new(BLAST, "blast", ActionLogic::Aoe)
                .with_timing(1.0, 0.5)
                .with_amount(6)
                .with_range(5.0)
        },
        ActionConfig::new(BEAM, "beam", ActionLogic::RangedFxTargeted)
            .with_timing(2.0, 0.5)
            .with_projectile(ProjectileInfo {
                prefab: "beam".to_owned(),
                speed: 10.0,
                damage: 9,
                ..ProjectileInfo::default()
            }),
        ["bolt_weak", "bolt_mid", "bolt_full"].into_iter().fold(
            ActionConfig::new(CHARGED_BOLT, "charged_bolt", ActionLogic::ChargedLaunchProjectile)
                .with_timing(2.0, 1.0)
                .with_anims(Some("charge"), Some("release")),
            |config, prefab| {
                config.with_projectile(ProjectileInfo {
                    prefab: prefab.to_owned(),
                    ..ProjectileInfo::default()
                })
            },
        ),
    ];
    ActionCatalog::from_configs(reserved, configs).expect("test catalog is valid")
}

// ===== character =====

#[derive(Debug, Default)]
pub struct FakeMovement {
    pub cancel_count: usize,
    pub forced: bool,
    pub moving: bool,
    pub following: Option<EntityId>,
    pub teleported_to: Option<Vec3>,
    pub charges: Vec<(f32, f32)>,
}

impl MovementController for FakeMovement {
    fn cancel_move(&mut self) {
        self.cancel_count += 1;
        self.moving = false;
        self.following = None;
    }

    fn is_performing_forced_movement(&self) -> bool {
        self.forced
    }

    fn is_moving(&self) -> bool {
        self.moving
    }

    fn follow(&mut self, target: EntityId) {
        self.moving = true;
        self.following = Some(target);
    }

    fn teleport(&mut self, position: Vec3) {
        self.teleported_to = Some(position);
    }

    fn start_forward_charge(&mut self, speed: f32, duration: f32) {
        self.charges.push((speed, duration));
    }
}

#[derive(Debug, Default)]
pub struct FakeAnimator {
    pub triggers: Vec<String>,
    pub resets: Vec<String>,
}

impl AnimationSink for FakeAnimator {
    fn set_trigger(&mut self, name: &str) {
        self.triggers.push(name.to_owned());
    }

    fn reset_trigger(&mut self, name: &str) {
        self.resets.push(name.to_owned());
    }
}

#[derive(Debug)]
pub struct FakeCharacter {
    pub id: EntityId,
    pub npc: bool,
    pub position: Vec3,
    pub facing: Vec3,
    pub target: Option<EntityId>,
    pub stealthy: bool,
    pub movement: FakeMovement,
    pub animator: FakeAnimator,
}

impl FakeCharacter {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            npc: false,
            position: Vec3::ZERO,
            facing: Vec3::FORWARD,
            target: None,
            stealthy: false,
            movement: FakeMovement::default(),
            animator: FakeAnimator::default(),
        }
    }
}

impl ServerCharacter for FakeCharacter {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn is_npc(&self) -> bool {
        self.npc
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn facing(&self) -> Vec3 {
        self.facing
    }

    fn set_facing(&mut self, direction: Vec3) {
        self.facing = direction;
    }

    fn target_id(&self) -> Option<EntityId> {
        self.target
    }

    fn set_target_id(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    fn set_stealthy(&mut self, stealthy: bool) {
        self.stealthy = stealthy;
    }

    fn movement(&mut self) -> Option<&mut dyn MovementController> {
        Some(&mut self.movement)
    }

    fn animator(&mut self) -> Option<&mut dyn AnimationSink> {
        Some(&mut self.animator)
    }
}

// ===== world =====

#[derive(Clone, Copy, Debug)]
pub struct FakeEntity {
    pub position: Vec3,
    pub life: Option<LifeState>,
    pub npc: bool,
}

#[derive(Debug, Default)]
pub struct FakeWorld {
    pub entities: BTreeMap<EntityId, FakeEntity>,
    pub hp_changes: Vec<(EntityId, EntityId, i32)>,
    pub revived: Vec<(EntityId, EntityId, i32)>,
    pub projectiles: Vec<(EntityId, Option<EntityId>, String)>,
    pub knockbacks: Vec<EntityId>,
    pub stun_chance: HashMap<EntityId, f32>,
    pub roll: f32,
}

impl FakeWorld {
    pub fn spawn_npc(&mut self, id: EntityId, position: Vec3) {
        self.entities.insert(
            id,
            FakeEntity {
                position,
                life: Some(LifeState::Alive),
                npc: true,
            },
        );
    }

    pub fn spawn_ally(&mut self, id: EntityId, position: Vec3, life: LifeState) {
        self.entities.insert(
            id,
            FakeEntity {
                position,
                life: Some(life),
                npc: false,
            },
        );
    }

    pub fn move_entity(&mut self, id: EntityId, position: Vec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.position = position;
        }
    }
}

impl World for FakeWorld {
    fn position_of(&self, entity: EntityId) -> Option<Vec3> {
        self.entities.get(&entity).map(|e| e.position)
    }

    fn life_state(&self, entity: EntityId) -> Option<LifeState> {
        self.entities.get(&entity).and_then(|e| e.life)
    }

    fn is_npc(&self, entity: EntityId) -> Option<bool> {
        self.entities.get(&entity).map(|e| e.npc)
    }

    fn entities_within(&self, center: Vec3, radius: f32) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.position.distance(center) <= radius)
            .map(|(&id, _)| id)
            .collect()
    }

    fn apply_hp(&mut self, source: EntityId, target: EntityId, delta: i32) {
        self.hp_changes.push((source, target, delta));
    }

    fn revive(&mut self, source: EntityId, target: EntityId, hp: i32) {
        self.revived.push((source, target, hp));
        if let Some(entity) = self.entities.get_mut(&target) {
            entity.life = Some(LifeState::Alive);
        }
    }

    fn spawn_projectile(&mut self, launch: &ProjectileLaunch<'_>) {
        self.projectiles
            .push((launch.owner, launch.target, launch.info.prefab.clone()));
    }

    fn start_knockback(&mut self, victim: EntityId, _from: Vec3, _speed: f32, _duration: f32) {
        self.knockbacks.push(victim);
    }

    fn buffed_value(&self, entity: EntityId, kind: BuffableValue) -> Option<f32> {
        match kind {
            BuffableValue::ChanceToStunTramplers => self.stun_chance.get(&entity).copied(),
            _ => None,
        }
    }

    fn roll_unit(&mut self) -> f32 {
        self.roll
    }
}

// ===== harness =====

/// One player driving one character, with a hand-advanced clock.
pub struct Harness {
    pub player: ActionPlayer,
    pub character: FakeCharacter,
    pub world: FakeWorld,
    pub now: f32,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            player: ActionPlayer::new(Arc::new(test_catalog()), config),
            character: FakeCharacter::new(PLAYER),
            world: FakeWorld::default(),
            now: 0.0,
        }
    }

    pub fn play(&mut self, request: ActionRequest) -> PlayOutcome {
        let mut cx = ActionContext::new(self.now, &mut self.character, &mut self.world);
        self.player.play(&mut cx, request)
    }

    /// Moves the clock forward by `dt` seconds and runs one update.
    pub fn advance(&mut self, dt: f32) {
        self.now += dt;
        let mut cx = ActionContext::new(self.now, &mut self.character, &mut self.world);
        self.player.on_update(&mut cx);
    }

    pub fn clear(&mut self, cancel_non_blocking: bool) {
        let mut cx = ActionContext::new(self.now, &mut self.character, &mut self.world);
        self.player.clear(&mut cx, cancel_non_blocking);
    }

    pub fn activity(&mut self, activity: GameplayActivity) {
        let mut cx = ActionContext::new(self.now, &mut self.character, &mut self.world);
        self.player.on_gameplay_activity(&mut cx, activity);
    }

    pub fn collide(&mut self, other: EntityId) {
        let mut cx = ActionContext::new(self.now, &mut self.character, &mut self.world);
        self.player.collision_entered(&mut cx, other);
    }

    pub fn cancel_by_logic(&mut self, logic: ActionLogic, cancel_all: bool) {
        let mut cx = ActionContext::new(self.now, &mut self.character, &mut self.world);
        self.player
            .cancel_running_actions_by_logic(&mut cx, logic, cancel_all, None);
    }

    pub fn active_action(&self) -> Option<ActionId> {
        self.player
            .get_active_blocking_action()
            .map(|request| request.action_id)
    }

    pub fn events(&mut self) -> Vec<ActionEvent> {
        self.player.drain_events()
    }

    /// Ids of the actions whose `on_start` ran since the last drain, in order.
    pub fn started(&mut self) -> Vec<ActionId> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ActionEvent::Started { action_id, .. } => Some(action_id),
                _ => None,
            })
            .collect()
    }
}
