//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the simulation.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use action_core::{ActionCatalog, ActionOracle, EngineConfig};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{SimulationWorker, WorkerSettings};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    /// Fixed simulation rate. Values below 1 are treated as 1.
    pub tick_rate_hz: f32,
    /// Tick on a wall-clock interval. When disabled the simulation only
    /// advances through [`RuntimeHandle::step`].
    pub auto_tick: bool,
    /// Voluntary movement speed in units per second.
    pub walk_speed: f32,
    /// Seed for the world's random rolls.
    pub rng_seed: u64,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_RATE_HZ: f32 = 30.0;
    pub const DEFAULT_WALK_SPEED: f32 = 5.0;

    /// Seconds of simulated time per tick.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz.max(1.0)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            tick_rate_hz: Self::DEFAULT_TICK_RATE_HZ,
            auto_tick: true,
            walk_speed: Self::DEFAULT_WALK_SPEED,
            rng_seed: 0,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that hosts the simulation
///
/// Design: Runtime owns the worker task.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to one event topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every handle clone has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

enum CatalogSource {
    /// Validated when the runtime is built.
    Catalog(ActionCatalog),
    Oracle(Arc<dyn ActionOracle>),
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<CatalogSource>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the engine configuration
    pub fn engine_config(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    /// Set the action catalog. It is validated when the runtime is built.
    pub fn catalog(mut self, catalog: ActionCatalog) -> Self {
        self.catalog = Some(CatalogSource::Catalog(catalog));
        self
    }

    /// Set a custom catalog source. It is used as-is.
    pub fn oracle(mut self, oracle: Arc<dyn ActionOracle>) -> Self {
        self.catalog = Some(CatalogSource::Oracle(oracle));
        self
    }

    /// Disable wall-clock ticking so tests can step deterministically.
    pub fn manual_ticks(mut self) -> Self {
        self.config.auto_tick = false;
        self
    }

    /// Build the runtime and spawn the simulation worker.
    pub async fn build(self) -> Result<Runtime> {
        let catalog: Arc<dyn ActionOracle> = match self.catalog {
            Some(CatalogSource::Catalog(catalog)) => {
                catalog.validate()?;
                Arc::new(catalog)
            }
            Some(CatalogSource::Oracle(oracle)) => oracle,
            None => return Err(RuntimeError::MissingCatalog),
        };

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size.max(1));

        let settings = WorkerSettings {
            engine: self.config.engine.clone(),
            tick_seconds: self.config.tick_seconds(),
            auto_tick: self.config.auto_tick,
            walk_speed: self.config.walk_speed,
            rng_seed: self.config.rng_seed,
        };
        let worker = SimulationWorker::new(catalog, settings, command_rx, event_bus.clone());
        let sim_worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            sim_worker_handle,
        })
    }
}
