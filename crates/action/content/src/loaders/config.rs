//! Engine configuration loader.

use std::path::Path;

use action_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Fields missing from the file keep their [`EngineConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_queue_time_depth <= 0.0 {
            anyhow::bail!(
                "max_queue_time_depth must be positive, got {}",
                config.max_queue_time_depth
            );
        }
        Ok(config)
    }
}
