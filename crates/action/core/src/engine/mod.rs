//! Scheduling: the per-character player and the pieces it is built from.
pub(crate) mod context;
mod cooldown;
mod events;
mod player;
pub mod synthesis;

pub use context::ActionContext;
pub use cooldown::CooldownTracker;
pub use events::{ActionEvent, DiscardReason};
pub use player::{ActionPlayer, PlayOutcome};
