//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and catalog validation so clients
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use action_core::{ActionId, CatalogError, EntityId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("character {0} is not spawned")]
    UnknownCharacter(EntityId),

    #[error("character {0} is already spawned")]
    DuplicateCharacter(EntityId),

    #[error("action {0} is not in the catalog")]
    UnknownAction(ActionId),

    #[error("runtime requires an action catalog before building")]
    MissingCatalog,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
