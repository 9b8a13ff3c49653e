//! Headless simulation entry point.
//!
//! Spawns a small skirmish, steps it for a fixed number of ticks and prints
//! every action and character event as one JSON object per line on stdout.
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::TryRecvError;

use action_content::{CatalogLoader, ConfigLoader, load_default_catalog};
use action_core::{ActionId, ActionRequest, EngineConfig, EntityId, Vec3};
use action_runtime::{CharacterSpec, Runtime, RuntimeConfig, RuntimeHandle, Topic};

const PLAYER: EntityId = EntityId(1);
const SUPPORT: EntityId = EntityId(2);
const GRUNT: EntityId = EntityId(10);
const BRUTE: EntityId = EntityId(11);

// ids from the bundled catalog
const SWING: ActionId = ActionId(10);
const TANK_TRAMPLE: ActionId = ActionId(11);
const ARCHER_SHOT: ActionId = ActionId(13);
const CHARGED_SHIELD: ActionId = ActionId(21);
const RALLY: ActionId = ActionId(23);

/// Simulation settings read from the environment.
#[derive(Clone, Debug)]
struct SimConfig {
    ticks: u32,
    tick_rate_hz: f32,
    seed: u64,
    catalog_path: Option<PathBuf>,
    engine_config_path: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 150,
            tick_rate_hz: RuntimeConfig::DEFAULT_TICK_RATE_HZ,
            seed: 0,
            catalog_path: None,
            engine_config_path: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ACTION_SIM_TICKS` - Ticks to simulate (default: 150)
    /// - `ACTION_SIM_TICK_HZ` - Simulation rate (default: 30)
    /// - `ACTION_SIM_SEED` - Seed for random rolls (default: 0)
    /// - `ACTION_CATALOG_PATH` - RON catalog file (default: bundled catalog)
    /// - `ACTION_ENGINE_CONFIG` - TOML engine config (default: built-in defaults)
    fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u32>("ACTION_SIM_TICKS") {
            config.ticks = ticks;
        }
        if let Some(hz) = read_env::<f32>("ACTION_SIM_TICK_HZ") {
            config.tick_rate_hz = hz.max(1.0);
        }
        if let Some(seed) = read_env::<u64>("ACTION_SIM_SEED") {
            config.seed = seed;
        }
        config.catalog_path = env::var_os("ACTION_CATALOG_PATH").map(PathBuf::from);
        config.engine_config_path = env::var_os("ACTION_ENGINE_CONFIG").map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    tracing::info!(?config, "starting action simulation");

    let catalog = match &config.catalog_path {
        Some(path) => CatalogLoader::load(path)?,
        None => load_default_catalog()?,
    };
    let engine = match &config.engine_config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => EngineConfig::default(),
    };

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            engine,
            tick_rate_hz: config.tick_rate_hz,
            auto_tick: false,
            rng_seed: config.seed,
            event_buffer_size: 1024,
            ..RuntimeConfig::default()
        })
        .catalog(catalog)
        .build()
        .await
        .context("Failed to build runtime")?;
    let handle = runtime.handle();
    let mut receivers = handle.subscribe_multiple(&[Topic::Character, Topic::Action]);

    populate(&handle).await?;

    for _ in 0..config.ticks {
        handle.step(1).await?;
        for receiver in receivers.values_mut() {
            loop {
                match receiver.try_recv() {
                    Ok(event) => println!("{}", serde_json::to_string(&event)?),
                    Err(TryRecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event receiver lagged");
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }
    }

    for id in [PLAYER, SUPPORT, GRUNT, BRUTE] {
        let snapshot = handle.query_character(id).await?;
        tracing::info!(
            character = %id,
            hp = snapshot.hp,
            life = ?snapshot.life,
            running = snapshot.running_actions,
            "final state"
        );
    }

    drop(receivers);
    drop(handle);
    runtime.shutdown().await?;
    Ok(())
}

/// Two heroes against two monsters, each opening with a signature action.
async fn populate(handle: &RuntimeHandle) -> Result<()> {
    handle
        .spawn_character(CharacterSpec::new(PLAYER, false, Vec3::ZERO, 100))
        .await?;
    handle
        .spawn_character(
            CharacterSpec::new(SUPPORT, false, Vec3::new(-2.0, 0.0, 0.0), 80)
                .with_starting_action(RALLY),
        )
        .await?;
    handle
        .spawn_character(CharacterSpec::new(GRUNT, true, Vec3::new(0.0, 0.0, 6.0), 40))
        .await?;
    handle
        .spawn_character(CharacterSpec::new(BRUTE, true, Vec3::new(3.0, 0.0, 8.0), 120))
        .await?;

    let openers = [
        (
            PLAYER,
            ActionRequest::new(SWING).with_target(GRUNT).closing(true),
        ),
        (PLAYER, ActionRequest::new(SWING).with_target(GRUNT).queued(true)),
        (SUPPORT, ActionRequest::new(CHARGED_SHIELD)),
        (BRUTE, ActionRequest::new(TANK_TRAMPLE).with_target(PLAYER)),
        (GRUNT, ActionRequest::new(ARCHER_SHOT).with_target(SUPPORT)),
    ];
    for (id, request) in openers {
        let action = request.action_id;
        match handle.play(id, request).await {
            Ok(outcome) => tracing::info!(character = %id, %action, ?outcome, "opener played"),
            Err(err) => tracing::warn!(character = %id, %action, %err, "opener rejected"),
        }
    }
    Ok(())
}
