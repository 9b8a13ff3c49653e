//! Server-side action execution for characters.
//!
//! `action-core` schedules and runs the actions a character performs: a
//! blocking queue with one active head, background (non-blocking) instances,
//! cooldowns, implicit target/chase helpers, chained follow-ups and buff
//! aggregation. Hosts supply the catalog through [`env::ActionOracle`] and
//! borrow their character and world into each call through
//! [`engine::ActionContext`]; all state mutation flows through
//! [`engine::ActionPlayer`].
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod types;

pub use action::{
    ActionConfig, ActionId, ActionInstance, ActionLogic, ActionPool, ActionRequest, BlockingMode,
    BuffEffect, BuffModifier, BuffableValue, GameplayActivity, InstanceId, InstanceState,
    ProjectileInfo, RequestFlags, TargetIds,
};
pub use config::{BuffBaselines, EngineConfig};
pub use engine::{
    ActionContext, ActionEvent, ActionPlayer, CooldownTracker, DiscardReason, PlayOutcome,
};
pub use env::{
    ActionCatalog, ActionOracle, AnimationSink, MovementController, ProjectileLaunch,
    ReservedActions, ServerCharacter, World,
};
pub use error::{CatalogError, ErrorSeverity, GameError};
pub use types::{EntityId, LifeState, Vec3};
