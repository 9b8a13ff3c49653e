//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns every character and executes their commands.

mod simulation;

pub use simulation::{Command, SimulationWorker, WorkerSettings};
