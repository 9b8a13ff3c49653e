//! Action data types and per-logic behaviors.
//!
//! - [`ActionConfig`] is the static catalog entry
//! - [`ActionRequest`] is what callers submit
//! - [`ActionInstance`] is one in-flight action, stored in an [`ActionPool`]
//! - `kinds` holds the behavior for each [`ActionLogic`]

mod buff;
mod config;
mod instance;
mod kind;
pub(crate) mod kinds;
mod pool;
mod request;

pub use buff::{BuffEffect, BuffModifier, BuffableValue, GameplayActivity};
pub use config::{ActionConfig, ProjectileInfo};
pub use instance::{ActionInstance, InstanceId, InstanceState};
pub use kind::{ActionId, ActionLogic, BlockingMode};
pub use pool::ActionPool;
pub use request::{ActionRequest, RequestFlags, TargetIds};
