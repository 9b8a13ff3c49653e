//! Plain data exchanged between clients and the simulation worker.

use serde::{Deserialize, Serialize};

use action_core::{ActionId, ActionRequest, EntityId, LifeState, Vec3};

use crate::world::MovementState;

/// Everything needed to put a character into the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSpec {
    pub id: EntityId,
    pub npc: bool,
    pub position: Vec3,
    pub max_hp: i32,
    /// Played right after spawning when set.
    pub starting_action: Option<ActionId>,
}

impl CharacterSpec {
    pub fn new(id: EntityId, npc: bool, position: Vec3, max_hp: i32) -> Self {
        Self {
            id,
            npc,
            position,
            max_hp,
            starting_action: None,
        }
    }

    pub fn with_starting_action(mut self, action_id: ActionId) -> Self {
        self.starting_action = Some(action_id);
        self
    }
}

/// Read-only view of one character, for clients and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: EntityId,
    pub npc: bool,
    pub position: Vec3,
    pub facing: Vec3,
    pub hp: i32,
    pub max_hp: i32,
    pub life: LifeState,
    pub target: Option<EntityId>,
    pub stealthy: bool,
    pub movement: MovementState,
    pub active_action: Option<ActionRequest>,
    pub running_actions: usize,
    pub queued_actions: usize,
}
