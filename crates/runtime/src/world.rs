//! Host-side collaborators for the action engine.
//!
//! [`SimWorld`] keeps the authoritative body table (position, hit points, life
//! state) and queues every effect an action asks for. The simulation worker
//! drains and resolves those effects after each player call, so a hook never
//! observes a half-applied hit.
//!
//! [`SimCharacter`] owns its kinematics through [`SimMovement`]; the worker
//! copies positions back into the body table after movement steps.

use std::collections::{BTreeMap, HashMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use action_core::{
    AnimationSink, BuffableValue, EntityId, LifeState, MovementController, ProjectileLaunch,
    ServerCharacter, Vec3, World,
};

/// Distance at which two bodies (or a projectile and a body) are in contact.
pub const CONTACT_DISTANCE: f32 = 1.0;

/// How close a voluntary move has to get before it counts as arrived.
const ARRIVAL_DISTANCE: f32 = 0.1;

/// Authoritative per-entity state the world answers queries from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    pub npc: bool,
    pub hp: i32,
    pub max_hp: i32,
    pub life: LifeState,
}

/// Something an action did to the world that the host still has to resolve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum WorldEffect {
    Hp {
        source: EntityId,
        target: EntityId,
        delta: i32,
    },
    Revive {
        source: EntityId,
        target: EntityId,
        hp: i32,
    },
    Knockback {
        victim: EntityId,
        from: Vec3,
        speed: f32,
        duration: f32,
    },
}

/// Projectile in flight.
#[derive(Debug, Clone)]
struct Projectile {
    owner: EntityId,
    owner_npc: bool,
    prefab: String,
    position: Vec3,
    direction: Vec3,
    speed: f32,
    travelled: f32,
    range: f32,
    damage: i32,
    victims_left: u32,
    hit: Vec<EntityId>,
}

/// A projectile connecting with a body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProjectileHit {
    pub owner: EntityId,
    pub victim: EntityId,
    pub prefab: String,
}

pub struct SimWorld {
    bodies: BTreeMap<EntityId, Body>,
    buffs: HashMap<(EntityId, BuffableValue), f32>,
    effects: VecDeque<WorldEffect>,
    projectiles: Vec<Projectile>,
    rng: StdRng,
}

impl SimWorld {
    pub fn new(seed: u64) -> Self {
        Self {
            bodies: BTreeMap::new(),
            buffs: HashMap::new(),
            effects: VecDeque::new(),
            projectiles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn insert_body(&mut self, id: EntityId, body: Body) -> Option<Body> {
        self.bodies.insert(id, body)
    }

    pub fn remove_body(&mut self, id: EntityId) -> Option<Body> {
        self.buffs.retain(|(owner, _), _| *owner != id);
        self.bodies.remove(&id)
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub(crate) fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &Body)> {
        self.bodies.iter().map(|(id, body)| (*id, body))
    }

    pub(crate) fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.position = position;
        }
    }

    /// Records the value other characters' actions will see for `id`.
    pub(crate) fn set_buff_snapshot(&mut self, id: EntityId, kind: BuffableValue, value: f32) {
        self.buffs.insert((id, kind), value);
    }

    pub(crate) fn pop_effect(&mut self) -> Option<WorldEffect> {
        self.effects.pop_front()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Moves every projectile forward and queues damage for what it runs into.
    pub(crate) fn step_projectiles(&mut self, dt: f32) -> Vec<ProjectileHit> {
        let mut hits = Vec::new();
        let mut projectiles = std::mem::take(&mut self.projectiles);

        projectiles.retain_mut(|projectile| {
            let step = projectile.speed * dt;
            projectile.position = projectile.position + projectile.direction * step;
            projectile.travelled += step;

            for (id, body) in &self.bodies {
                if projectile.victims_left == 0 {
                    break;
                }
                if *id == projectile.owner
                    || body.npc == projectile.owner_npc
                    || !body.life.is_alive()
                    || projectile.hit.contains(id)
                    || body.position.distance_squared(projectile.position)
                        > CONTACT_DISTANCE * CONTACT_DISTANCE
                {
                    continue;
                }

                projectile.hit.push(*id);
                projectile.victims_left -= 1;
                if projectile.damage != 0 {
                    self.effects.push_back(WorldEffect::Hp {
                        source: projectile.owner,
                        target: *id,
                        delta: -projectile.damage,
                    });
                }
                hits.push(ProjectileHit {
                    owner: projectile.owner,
                    victim: *id,
                    prefab: projectile.prefab.clone(),
                });
            }

            projectile.victims_left > 0 && projectile.travelled < projectile.range
        });

        self.projectiles = projectiles;
        hits
    }
}

impl World for SimWorld {
    fn position_of(&self, entity: EntityId) -> Option<Vec3> {
        self.bodies.get(&entity).map(|body| body.position)
    }

    fn life_state(&self, entity: EntityId) -> Option<LifeState> {
        self.bodies.get(&entity).map(|body| body.life)
    }

    fn is_npc(&self, entity: EntityId) -> Option<bool> {
        self.bodies.get(&entity).map(|body| body.npc)
    }

    fn entities_within(&self, center: Vec3, radius: f32) -> Vec<EntityId> {
        let radius_squared = radius * radius;
        self.bodies
            .iter()
            .filter(|(_, body)| body.position.distance_squared(center) <= radius_squared)
            .map(|(id, _)| *id)
            .collect()
    }

    fn apply_hp(&mut self, source: EntityId, target: EntityId, delta: i32) {
        if self.bodies.contains_key(&target) {
            self.effects.push_back(WorldEffect::Hp {
                source,
                target,
                delta,
            });
        }
    }

    fn revive(&mut self, source: EntityId, target: EntityId, hp: i32) {
        if self.bodies.contains_key(&target) {
            self.effects
                .push_back(WorldEffect::Revive { source, target, hp });
        }
    }

    fn spawn_projectile(&mut self, launch: &ProjectileLaunch<'_>) {
        let owner_npc = self.is_npc(launch.owner).unwrap_or(false);

        // aim at the target when there is one, otherwise fly along the given direction
        let aimed = launch
            .target
            .and_then(|target| self.position_of(target))
            .map(|position| (position - launch.origin).normalized())
            .filter(|direction| !direction.is_zero());
        let direction = aimed.unwrap_or(launch.direction.normalized());
        if direction.is_zero() {
            debug!(
                owner = %launch.owner,
                prefab = %launch.info.prefab,
                "projectile has no direction, dropped"
            );
            return;
        }

        trace!(owner = %launch.owner, prefab = %launch.info.prefab, "projectile spawned");
        self.projectiles.push(Projectile {
            owner: launch.owner,
            owner_npc,
            prefab: launch.info.prefab.clone(),
            position: launch.origin,
            direction,
            speed: launch.info.speed,
            travelled: 0.0,
            range: launch.info.range,
            damage: launch.info.damage,
            victims_left: launch.info.max_victims.max(1),
            hit: Vec::new(),
        });
    }

    fn start_knockback(&mut self, victim: EntityId, from: Vec3, speed: f32, duration: f32) {
        if speed > 0.0 && duration > 0.0 && self.bodies.contains_key(&victim) {
            self.effects.push_back(WorldEffect::Knockback {
                victim,
                from,
                speed,
                duration,
            });
        }
    }

    fn buffed_value(&self, entity: EntityId, kind: BuffableValue) -> Option<f32> {
        self.buffs.get(&(entity, kind)).copied()
    }

    fn roll_unit(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// What a character's body is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementState {
    Idle,
    MovingTo(Vec3),
    Following(EntityId),
    Charging { velocity: Vec3, remaining: f32 },
    Knockback { velocity: Vec3, remaining: f32 },
}

/// Straight-line kinematics for one character.
#[derive(Debug, Clone)]
pub struct SimMovement {
    position: Vec3,
    facing: Vec3,
    state: MovementState,
    walk_speed: f32,
}

impl SimMovement {
    pub fn new(position: Vec3, walk_speed: f32) -> Self {
        Self {
            position,
            facing: Vec3::FORWARD,
            state: MovementState::Idle,
            walk_speed,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    /// Entity being followed, if any.
    pub fn follow_target(&self) -> Option<EntityId> {
        match self.state {
            MovementState::Following(target) => Some(target),
            _ => None,
        }
    }

    pub fn move_to(&mut self, destination: Vec3) {
        self.state = MovementState::MovingTo(destination);
    }

    /// Pushes the body away from `from`.
    pub fn knock_back(&mut self, from: Vec3, speed: f32, duration: f32) {
        let mut direction = (self.position - from).normalized();
        if direction.is_zero() {
            direction = self.facing * -1.0;
        }
        self.state = MovementState::Knockback {
            velocity: direction * speed,
            remaining: duration,
        };
    }

    /// Advances by `dt` seconds. `follow_position` is where the followed entity is now.
    pub fn step(&mut self, dt: f32, follow_position: Option<Vec3>) {
        match self.state {
            MovementState::Idle => {}
            MovementState::MovingTo(destination) => {
                if self.walk_toward(destination, dt, ARRIVAL_DISTANCE) {
                    self.state = MovementState::Idle;
                }
            }
            MovementState::Following(_) => match follow_position {
                Some(position) => {
                    self.walk_toward(position, dt, CONTACT_DISTANCE);
                }
                None => self.state = MovementState::Idle,
            },
            MovementState::Charging {
                velocity,
                remaining,
            } => {
                self.position = self.position + velocity * dt.min(remaining);
                let remaining = remaining - dt;
                self.state = if remaining > 0.0 {
                    MovementState::Charging {
                        velocity,
                        remaining,
                    }
                } else {
                    MovementState::Idle
                };
            }
            MovementState::Knockback {
                velocity,
                remaining,
            } => {
                self.position = self.position + velocity * dt.min(remaining);
                let remaining = remaining - dt;
                self.state = if remaining > 0.0 {
                    MovementState::Knockback {
                        velocity,
                        remaining,
                    }
                } else {
                    MovementState::Idle
                };
            }
        }
    }

    /// Walks toward `point`, stopping `stop_distance` short. Returns true once there.
    fn walk_toward(&mut self, point: Vec3, dt: f32, stop_distance: f32) -> bool {
        let offset = point - self.position;
        let distance = offset.length();
        if distance <= stop_distance {
            return true;
        }

        let direction = offset.normalized();
        self.facing = direction;
        let step = (self.walk_speed * dt).min(distance - stop_distance);
        self.position = self.position + direction * step;
        distance - step <= stop_distance
    }
}

impl MovementController for SimMovement {
    fn cancel_move(&mut self) {
        self.state = MovementState::Idle;
    }

    fn is_performing_forced_movement(&self) -> bool {
        matches!(
            self.state,
            MovementState::Charging { .. } | MovementState::Knockback { .. }
        )
    }

    fn is_moving(&self) -> bool {
        self.state != MovementState::Idle
    }

    fn follow(&mut self, target: EntityId) {
        if !self.is_performing_forced_movement() {
            self.state = MovementState::Following(target);
        }
    }

    fn teleport(&mut self, position: Vec3) {
        self.position = position;
    }

    fn start_forward_charge(&mut self, speed: f32, duration: f32) {
        self.state = MovementState::Charging {
            velocity: self.facing * speed,
            remaining: duration,
        };
    }
}

/// Animation triggers only show up in trace logs on the server.
#[derive(Debug, Clone, Copy)]
struct TraceAnimator {
    owner: EntityId,
}

impl AnimationSink for TraceAnimator {
    fn set_trigger(&mut self, name: &str) {
        trace!(character = %self.owner, trigger = name, "animation trigger set");
    }

    fn reset_trigger(&mut self, name: &str) {
        trace!(character = %self.owner, trigger = name, "animation trigger reset");
    }
}

/// Server-side character driven by one action player.
#[derive(Debug, Clone)]
pub struct SimCharacter {
    id: EntityId,
    npc: bool,
    movement: SimMovement,
    target: Option<EntityId>,
    stealthy: bool,
    animator: TraceAnimator,
}

impl SimCharacter {
    pub fn new(id: EntityId, npc: bool, movement: SimMovement) -> Self {
        Self {
            id,
            npc,
            movement,
            target: None,
            stealthy: false,
            animator: TraceAnimator { owner: id },
        }
    }

    pub fn sim_movement(&self) -> &SimMovement {
        &self.movement
    }

    pub(crate) fn sim_movement_mut(&mut self) -> &mut SimMovement {
        &mut self.movement
    }

    pub fn is_stealthy(&self) -> bool {
        self.stealthy
    }
}

impl ServerCharacter for SimCharacter {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn is_npc(&self) -> bool {
        self.npc
    }

    fn position(&self) -> Vec3 {
        self.movement.position
    }

    fn facing(&self) -> Vec3 {
        self.movement.facing
    }

    fn set_facing(&mut self, direction: Vec3) {
        self.movement.facing = direction;
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
