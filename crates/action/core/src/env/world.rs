//! Interfaces into the shared simulation the character lives in.

use crate::action::{BuffableValue, ProjectileInfo};
use crate::types::{EntityId, LifeState, Vec3};

/// Everything a world needs to spawn one projectile.
#[derive(Clone, Copy, Debug)]
pub struct ProjectileLaunch<'a> {
    pub owner: EntityId,
    pub origin: Vec3,
    pub direction: Vec3,
    pub target: Option<EntityId>,
    pub info: &'a ProjectileInfo,
}

/// World queries and effects used by action behaviors.
///
/// Lookups return `None` for entities that are gone; effects on missing
/// entities are expected to be ignored by the implementation.
pub trait World {
    /// Position of a spawned entity, `None` once despawned.
    fn position_of(&self, entity: EntityId) -> Option<Vec3>;

    /// Life state of a damageable entity, `None` for props and despawned entities.
    fn life_state(&self, entity: EntityId) -> Option<LifeState>;

    fn is_npc(&self, entity: EntityId) -> Option<bool>;

    /// Spawned entities within `radius` of `center`, in a stable order.
    fn entities_within(&self, center: Vec3, radius: f32) -> Vec<EntityId>;

    /// Applies a hit point change (`delta < 0` is damage).
    fn apply_hp(&mut self, source: EntityId, target: EntityId, delta: i32);

    fn revive(&mut self, source: EntityId, target: EntityId, hp: i32);

    fn spawn_projectile(&mut self, launch: &ProjectileLaunch<'_>);

    fn start_knockback(&mut self, _victim: EntityId, _from: Vec3, _speed: f32, _duration: f32) {}

    /// Another entity's current buffed value, when the world tracks it.
    fn buffed_value(&self, _entity: EntityId, _kind: BuffableValue) -> Option<f32> {
        None
    }

    /// Uniform roll in `[0, 1)`. The default never rolls above zero.
    fn roll_unit(&mut self) -> f32 {
        0.0
    }

    fn is_spawned(&self, entity: EntityId) -> bool {
        self.position_of(entity).is_some()
    }

    /// Spawned, and alive if it can die at all.
    fn is_valid_target(&self, entity: EntityId) -> bool {
        self.is_spawned(entity) && self.life_state(entity).is_none_or(LifeState::is_alive)
    }
}
