//! Tokio host for the action engine.
//!
//! This crate owns a set of simulated characters, drives their
//! [`action_core::ActionPlayer`]s at a fixed tick rate, and resolves the world
//! effects their actions produce. Consumers embed [`Runtime`] to step the
//! simulation, subscribe to events, and command characters through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`world`] implements the engine's character and world traits
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod types;
pub mod world;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{ActionEventRecord, CharacterEvent, Event, EventBus, TickEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use types::{CharacterSnapshot, CharacterSpec};
pub use world::{Body, MovementState, SimCharacter, SimMovement, SimWorld};
