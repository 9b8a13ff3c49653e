//! Traits describing what the engine reads and calls into.
//!
//! The catalog is read-only and shared between players. Characters and the
//! world are borrowed mutably for the duration of one player call through
//! [`crate::engine::ActionContext`].
mod catalog;
mod character;
mod world;

use std::sync::Arc;

use crate::action::{ActionConfig, ActionId};

pub use catalog::ActionCatalog;
pub use character::{AnimationSink, MovementController, ServerCharacter};
pub use world::{ProjectileLaunch, World};

/// Catalog ids the engine itself needs to know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservedActions {
    /// Synthesized ahead of an action whose single target is not the tracked one.
    pub acquire_target: ActionId,
    /// Synthesized ahead of an action that asked to close in on its target.
    pub move_to_target: ActionId,
    /// Chained after a trample that ran into something it could not push through.
    pub stunned: ActionId,
}

impl ReservedActions {
    pub const fn new(acquire_target: ActionId, move_to_target: ActionId, stunned: ActionId) -> Self {
        Self {
            acquire_target,
            move_to_target,
            stunned,
        }
    }
}

/// Read-only lookup of action configuration.
pub trait ActionOracle: Send + Sync {
    fn action_config(&self, id: ActionId) -> Option<Arc<ActionConfig>>;

    fn reserved(&self) -> ReservedActions;
}
