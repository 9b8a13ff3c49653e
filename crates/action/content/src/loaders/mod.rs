//! Content loaders for reading action data from files.
//!
//! Catalogs are RON, engine configuration is TOML. Every loader validates what
//! it reads before handing it to the engine.

pub mod catalog;
pub mod config;

pub use catalog::{CatalogFile, CatalogLoader, load_default_catalog};
pub use config::ConfigLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
