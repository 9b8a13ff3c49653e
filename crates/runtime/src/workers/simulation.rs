//! Simulation worker that owns every character and its [`ActionPlayer`].
//!
//! Receives commands from [`crate::RuntimeHandle`], advances the players at a
//! fixed tick rate, resolves the world effects their actions queue, and
//! publishes events to the EventBus.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use action_core::{
    ActionContext, ActionId, ActionLogic, ActionOracle, ActionPlayer, ActionRequest,
    BuffableValue, EngineConfig, EntityId, GameplayActivity, LifeState, MovementController,
    PlayOutcome, ServerCharacter, Vec3, World,
};

use crate::api::{Result, RuntimeError};
use crate::events::{ActionEventRecord, CharacterEvent, Event, EventBus, TickEvent};
use crate::types::{CharacterSnapshot, CharacterSpec};
use crate::world::{
    Body, CONTACT_DISTANCE, MovementState, SimCharacter, SimMovement, SimWorld, WorldEffect,
};

const BUFFABLE_VALUES: [BuffableValue; 3] = [
    BuffableValue::PercentHealingReceived,
    BuffableValue::PercentDamageReceived,
    BuffableValue::ChanceToStunTramplers,
];

/// Commands that can be sent to the simulation worker
pub enum Command {
    SpawnCharacter {
        spec: CharacterSpec,
        reply: oneshot::Sender<Result<()>>,
    },
    DespawnCharacter {
        id: EntityId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// `None` in the reply means the character could not act (not alive, or
    /// under forced movement) and the request was dropped before the player.
    Play {
        id: EntityId,
        request: ActionRequest,
        reply: oneshot::Sender<Result<Option<PlayOutcome>>>,
    },
    /// Voluntary move. Replies false when the character could not move.
    MoveTo {
        id: EntityId,
        destination: Vec3,
        reply: oneshot::Sender<Result<bool>>,
    },
    Clear {
        id: EntityId,
        cancel_non_blocking: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    NotifyActivity {
        id: EntityId,
        activity: GameplayActivity,
        reply: oneshot::Sender<Result<()>>,
    },
    CancelByLogic {
        id: EntityId,
        logic: ActionLogic,
        cancel_all: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    BuffedValue {
        id: EntityId,
        kind: BuffableValue,
        reply: oneshot::Sender<Result<f32>>,
    },
    ActiveAction {
        id: EntityId,
        reply: oneshot::Sender<Result<Option<ActionRequest>>>,
    },
    RunningActionCount {
        id: EntityId,
        reply: oneshot::Sender<Result<usize>>,
    },
    IsReuseElapsed {
        id: EntityId,
        action_id: ActionId,
        reply: oneshot::Sender<Result<bool>>,
    },
    /// Advance the simulation by `ticks` fixed steps.
    Step {
        ticks: u32,
        reply: oneshot::Sender<TickEvent>,
    },
    QueryCharacter {
        id: EntityId,
        reply: oneshot::Sender<Result<CharacterSnapshot>>,
    },
}

struct CharacterSlot {
    character: SimCharacter,
    player: ActionPlayer,
}

/// Settings the worker needs from [`crate::RuntimeConfig`].
pub struct WorkerSettings {
    pub engine: EngineConfig,
    pub tick_seconds: f32,
    pub auto_tick: bool,
    pub walk_speed: f32,
    pub rng_seed: u64,
}

/// Background task that owns the authoritative simulation.
pub struct SimulationWorker {
    catalog: Arc<dyn ActionOracle>,
    settings: WorkerSettings,
    characters: BTreeMap<EntityId, CharacterSlot>,
    world: SimWorld,
    tick: u64,
    now: f32,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        catalog: Arc<dyn ActionOracle>,
        settings: WorkerSettings,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            "SimulationWorker initialized: tick {}s, auto_tick {}, seed {}",
            settings.tick_seconds, settings.auto_tick, settings.rng_seed
        );

        Self {
            catalog,
            world: SimWorld::new(settings.rng_seed),
            settings,
            characters: BTreeMap::new(),
            tick: 0,
            now: 0.0,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let mut interval =
            tokio::time::interval(Duration::from_secs_f32(self.settings.tick_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = interval.tick(), if self.settings.auto_tick => {
                    self.tick();
                }
            }
        }
        debug!("SimulationWorker stopped after {} ticks", self.tick);
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SpawnCharacter { spec, reply } => {
                let result = self.handle_spawn(spec);
                if reply.send(result).is_err() {
                    debug!("SpawnCharacter reply channel closed (caller dropped)");
                }
            }
            Command::DespawnCharacter { id, reply } => {
                let result = self.handle_despawn(id);
                if reply.send(result).is_err() {
                    debug!("DespawnCharacter reply channel closed (caller dropped)");
                }
            }
            Command::Play { id, request, reply } => {
                let result = self.handle_play(id, request);
                if reply.send(result).is_err() {
                    debug!("Play reply channel closed (caller dropped)");
                }
            }
            Command::MoveTo {
                id,
                destination,
                reply,
            } => {
                let result = self.handle_move_to(id, destination);
                if reply.send(result).is_err() {
                    debug!("MoveTo reply channel closed (caller dropped)");
                }
            }
            Command::Clear {
                id,
                cancel_non_blocking,
                reply,
            } => {
                let result =
                    self.with_player(id, |player, cx| player.clear(cx, cancel_non_blocking));
                self.settle();
                if reply.send(result).is_err() {
                    debug!("Clear reply channel closed (caller dropped)");
                }
            }
            Command::NotifyActivity {
                id,
                activity,
                reply,
            } => {
                let result =
                    self.with_player(id, |player, cx| player.on_gameplay_activity(cx, activity));
                self.settle();
                if reply.send(result).is_err() {
                    debug!("NotifyActivity reply channel closed (caller dropped)");
                }
            }
            Command::CancelByLogic {
                id,
                logic,
                cancel_all,
                reply,
            } => {
                let result = self.with_player(id, |player, cx| {
                    player.cancel_running_actions_by_logic(cx, logic, cancel_all, None)
                });
                self.settle();
                if reply.send(result).is_err() {
                    debug!("CancelByLogic reply channel closed (caller dropped)");
                }
            }
            Command::BuffedValue { id, kind, reply } => {
                let result = self.slot(id).map(|slot| slot.player.get_buffed_value(kind));
                if reply.send(result).is_err() {
                    debug!("BuffedValue reply channel closed (caller dropped)");
                }
            }
            Command::ActiveAction { id, reply } => {
                let result = self
                    .slot(id)
                    .map(|slot| slot.player.get_active_blocking_action().cloned());
                if reply.send(result).is_err() {
                    debug!("ActiveAction reply channel closed (caller dropped)");
                }
            }
            Command::RunningActionCount { id, reply } => {
                let result = self.slot(id).map(|slot| slot.player.running_action_count());
                if reply.send(result).is_err() {
                    debug!("RunningActionCount reply channel closed (caller dropped)");
                }
            }
            Command::IsReuseElapsed {
                id,
                action_id,
                reply,
            } => {
                let result = self
                    .slot(id)
                    .map(|slot| slot.player.is_reuse_elapsed(action_id));
                if reply.send(result).is_err() {
                    debug!("IsReuseElapsed reply channel closed (caller dropped)");
                }
            }
            Command::Step { ticks, reply } => {
                let mut last = self.tick_event();
                for _ in 0..ticks {
                    last = self.tick();
                }
                if reply.send(last).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
            Command::QueryCharacter { id, reply } => {
                let result = self.snapshot(id);
                if reply.send(result).is_err() {
                    debug!("QueryCharacter reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn slot(&self, id: EntityId) -> Result<&CharacterSlot> {
        self.characters
            .get(&id)
            .ok_or(RuntimeError::UnknownCharacter(id))
    }

    /// Runs `f` against one character's player with a fresh context.
    fn with_player<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut ActionPlayer, &mut ActionContext<'_>) -> R,
    ) -> Result<R> {
        let slot = self
            .characters
            .get_mut(&id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;
        let mut cx = ActionContext::new(self.now, &mut slot.character, &mut self.world);
        Ok(f(&mut slot.player, &mut cx))
    }

    fn handle_spawn(&mut self, spec: CharacterSpec) -> Result<()> {
        if self.characters.contains_key(&spec.id) || self.world.body(spec.id).is_some() {
            return Err(RuntimeError::DuplicateCharacter(spec.id));
        }

        let life = if spec.max_hp > 0 {
            LifeState::Alive
        } else if spec.npc {
            LifeState::Dead
        } else {
            LifeState::Fainted
        };
        self.world.insert_body(
            spec.id,
            Body {
                position: spec.position,
                npc: spec.npc,
                hp: spec.max_hp.max(0),
                max_hp: spec.max_hp.max(0),
                life,
            },
        );

        let movement = SimMovement::new(spec.position, self.settings.walk_speed);
        let slot = CharacterSlot {
            character: SimCharacter::new(spec.id, spec.npc, movement),
            player: ActionPlayer::new(Arc::clone(&self.catalog), self.settings.engine.clone()),
        };
        self.characters.insert(spec.id, slot);

        debug!(character = %spec.id, npc = spec.npc, "character spawned");
        self.event_bus
            .publish(Event::Character(CharacterEvent::Spawned {
                id: spec.id,
                position: spec.position,
                npc: spec.npc,
            }));

        if let Some(action_id) = spec.starting_action {
            self.handle_play(spec.id, ActionRequest::new(action_id))?;
        }
        Ok(())
    }

    fn handle_despawn(&mut self, id: EntityId) -> Result<()> {
        self.with_player(id, |player, cx| player.clear(cx, true))?;
        self.settle();

        self.characters.remove(&id);
        self.world.remove_body(id);
        debug!(character = %id, "character despawned");
        self.event_bus
            .publish(Event::Character(CharacterEvent::Despawned { id }));
        Ok(())
    }

    fn handle_play(
        &mut self,
        id: EntityId,
        mut request: ActionRequest,
    ) -> Result<Option<PlayOutcome>> {
        let config = self
            .catalog
            .action_config(request.action_id)
            .ok_or(RuntimeError::UnknownAction(request.action_id))?;
        let alive = self.world.life_state(id).is_some_and(LifeState::is_alive);

        let outcome = self.with_player(id, |player, cx| {
            request.sanitize_level(cx.character.is_npc());

            // lets stealth and similar actions react before the attack is queued
            if !config.is_friendly {
                player.on_gameplay_activity(cx, GameplayActivity::UsingAttackAction);
            }

            if !alive || cx.character.is_under_forced_movement() {
                trace!(
                    character = %cx.character.entity_id(),
                    action = %request.action_id,
                    "character cannot act, request dropped"
                );
                return None;
            }
            if request.cancel_movement()
                && let Some(movement) = cx.character.movement()
            {
                movement.cancel_move();
            }
            Some(player.play(cx, request))
        })?;

        self.settle();
        Ok(outcome)
    }

    fn handle_move_to(&mut self, id: EntityId, destination: Vec3) -> Result<bool> {
        let alive = self.world.life_state(id).is_some_and(LifeState::is_alive);
        let catalog = Arc::clone(&self.catalog);

        let moved = self.with_player(id, |player, cx| {
            if !alive || cx.character.is_under_forced_movement() {
                return false;
            }

            let interruptible = player
                .get_active_blocking_action()
                .and_then(|active| catalog.action_config(active.action_id))
                .is_some_and(|config| config.action_interruptible);
            if interruptible {
                player.clear(cx, false);
            }
            // moving drops the current target
            player.cancel_running_actions_by_logic(cx, ActionLogic::Target, true, None);
            true
        })?;

        if moved && let Some(slot) = self.characters.get_mut(&id) {
            slot.character.sim_movement_mut().move_to(destination);
        }
        self.settle();
        Ok(moved)
    }

    /// Advances every character by one fixed step.
    fn tick(&mut self) -> TickEvent {
        self.tick += 1;
        self.now += self.settings.tick_seconds;

        self.refresh_buff_snapshots();

        let ids: Vec<EntityId> = self.characters.keys().copied().collect();
        for id in &ids {
            if let Some(slot) = self.characters.get_mut(id) {
                let mut cx = ActionContext::new(self.now, &mut slot.character, &mut self.world);
                slot.player.on_update(&mut cx);
                self.world.set_position(*id, slot.character.position());
            }
            self.resolve_effects();
        }

        self.step_movement(&ids);
        self.dispatch_collisions(&ids);
        self.step_projectiles();
        self.settle();

        let event = self.tick_event();
        self.event_bus.publish(Event::Tick(event));
        event
    }

    fn tick_event(&self) -> TickEvent {
        TickEvent {
            tick: self.tick,
            time: self.now,
        }
    }

    /// Publishes every player's current buffed values into the world so other
    /// characters' actions can read them.
    fn refresh_buff_snapshots(&mut self) {
        for (id, slot) in &self.characters {
            for kind in BUFFABLE_VALUES {
                self.world
                    .set_buff_snapshot(*id, kind, slot.player.get_buffed_value(kind));
            }
        }
    }

    fn step_movement(&mut self, ids: &[EntityId]) {
        let dt = self.settings.tick_seconds;
        for id in ids {
            let Some(slot) = self.characters.get_mut(id) else {
                continue;
            };
            let follow_position = slot
                .character
                .sim_movement()
                .follow_target()
                .and_then(|target| self.world.position_of(target));
            slot.character.sim_movement_mut().step(dt, follow_position);
            self.world.set_position(*id, slot.character.position());
        }
    }

    /// Reports contacts to characters that are charging.
    fn dispatch_collisions(&mut self, ids: &[EntityId]) {
        for id in ids {
            let Some(slot) = self.characters.get_mut(id) else {
                continue;
            };
            if !matches!(
                slot.character.sim_movement().state(),
                MovementState::Charging { .. }
            ) {
                continue;
            }

            let contacts = self
                .world
                .entities_within(slot.character.position(), CONTACT_DISTANCE);
            for other in contacts.into_iter().filter(|other| other != id) {
                let mut cx = ActionContext::new(self.now, &mut slot.character, &mut self.world);
                slot.player.collision_entered(&mut cx, other);
            }
            self.resolve_effects();
        }
    }

    fn step_projectiles(&mut self) {
        let hits = self.world.step_projectiles(self.settings.tick_seconds);
        for hit in hits {
            trace!(owner = %hit.owner, victim = %hit.victim, "projectile hit");
            self.event_bus
                .publish(Event::Character(CharacterEvent::ProjectileHit {
                    owner: hit.owner,
                    victim: hit.victim,
                    prefab: hit.prefab,
                }));
        }
        self.resolve_effects();
    }

    /// Resolves queued world effects, then forwards every player's journal.
    fn settle(&mut self) {
        self.resolve_effects();

        for (id, slot) in &mut self.characters {
            for event in slot.player.drain_events() {
                self.event_bus.publish(Event::Action(ActionEventRecord {
                    character: *id,
                    time: self.now,
                    event,
                }));
            }
        }
    }

    fn resolve_effects(&mut self) {
        while let Some(effect) = self.world.pop_effect() {
            match effect {
                WorldEffect::Hp {
                    source,
                    target,
                    delta,
                } => self.receive_hp(source, target, delta),
                WorldEffect::Revive { source, target, hp } => self.revive(source, target, hp),
                WorldEffect::Knockback {
                    victim,
                    from,
                    speed,
                    duration,
                } => {
                    if let Some(slot) = self.characters.get_mut(&victim) {
                        slot.character
                            .sim_movement_mut()
                            .knock_back(from, speed, duration);
                    }
                }
            }
        }
    }

    /// Applies a hit point change after the victim's running actions had a say.
    fn receive_hp(&mut self, source: EntityId, target: EntityId, delta: i32) {
        if !self.world.life_state(target).is_some_and(LifeState::is_alive) {
            trace!(%target, "hp change on a body that is not alive, ignored");
            return;
        }

        let delta = match self.characters.get_mut(&target) {
            Some(slot) => {
                let (activity, kind) = if delta > 0 {
                    (GameplayActivity::Healed, BuffableValue::PercentHealingReceived)
                } else {
                    (GameplayActivity::AttackedByEnemy, BuffableValue::PercentDamageReceived)
                };
                let mut cx = ActionContext::new(self.now, &mut slot.character, &mut self.world);
                slot.player.on_gameplay_activity(&mut cx, activity);
                (delta as f32 * slot.player.get_buffed_value(kind)) as i32
            }
            None => delta,
        };

        let Some(body) = self.world.body_mut(target) else {
            return;
        };
        // scaled deltas saturate at the i32 bounds
        let hp = body.hp.saturating_add(delta).clamp(0, body.max_hp);
        body.hp = hp;
        let npc = body.npc;

        self.event_bus
            .publish(Event::Character(CharacterEvent::HpChanged {
                id: target,
                source,
                delta,
                hp,
            }));

        if hp <= 0 {
            let life = if npc { LifeState::Dead } else { LifeState::Fainted };
            self.set_life_state(target, life);
        }
    }

    /// Brings a fainted body back. Anything else is left alone.
    fn revive(&mut self, source: EntityId, target: EntityId, hp: i32) {
        let Some(body) = self.world.body_mut(target) else {
            return;
        };
        if body.life != LifeState::Fainted {
            trace!(%target, life = ?body.life, "revive on a body that is not fainted, ignored");
            return;
        }

        let previous = body.hp;
        body.hp = hp.clamp(0, body.max_hp);
        let hp = body.hp;
        self.set_life_state(target, LifeState::Alive);
        self.event_bus
            .publish(Event::Character(CharacterEvent::HpChanged {
                id: target,
                source,
                delta: hp - previous,
                hp,
            }));
    }

    fn set_life_state(&mut self, id: EntityId, life: LifeState) {
        let Some(body) = self.world.body_mut(id) else {
            return;
        };
        if body.life == life {
            return;
        }
        body.life = life;
        debug!(character = %id, ?life, "life state changed");

        if !life.is_alive() {
            let now = self.now;
            if let Some(slot) = self.characters.get_mut(&id) {
                let mut cx = ActionContext::new(now, &mut slot.character, &mut self.world);
                slot.player.clear(&mut cx, true);
                slot.character.sim_movement_mut().cancel_move();
            }
        }

        self.event_bus
            .publish(Event::Character(CharacterEvent::LifeStateChanged { id, life }));
    }

    fn snapshot(&self, id: EntityId) -> Result<CharacterSnapshot> {
        let slot = self.slot(id)?;
        let body = self
            .world
            .body(id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;

        Ok(CharacterSnapshot {
            id,
            npc: body.npc,
            position: slot.character.position(),
            facing: slot.character.facing(),
            hp: body.hp,
            max_hp: body.max_hp,
            life: body.life,
            target: slot.character.target_id(),
            stealthy: slot.character.is_stealthy(),
            movement: slot.character.sim_movement().state(),
            active_action: slot.player.get_active_blocking_action().cloned(),
            running_actions: slot.player.running_action_count(),
            queued_actions: slot.player.queue_len(),
        })
    }
}
