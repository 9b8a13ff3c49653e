//! Event payloads published by the simulation worker.

use serde::{Deserialize, Serialize};

use action_core::{ActionEvent, EntityId, LifeState, Vec3};

/// One engine lifecycle event, tagged with the character and tick time it happened at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEventRecord {
    pub character: EntityId,
    /// Simulation time in seconds when the worker drained the event.
    pub time: f32,
    pub event: ActionEvent,
}

/// Emitted once per simulation tick, after every character has been advanced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    pub tick: u64,
    pub time: f32,
}

/// Character bookkeeping changes made by the host rather than by an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CharacterEvent {
    Spawned {
        id: EntityId,
        position: Vec3,
        npc: bool,
    },
    Despawned {
        id: EntityId,
    },
    /// `delta` is the change after buffs were applied; `hp` the clamped result.
    HpChanged {
        id: EntityId,
        source: EntityId,
        delta: i32,
        hp: i32,
    },
    LifeStateChanged {
        id: EntityId,
        life: LifeState,
    },
    ProjectileHit {
        owner: EntityId,
        victim: EntityId,
        prefab: String,
    },
}
