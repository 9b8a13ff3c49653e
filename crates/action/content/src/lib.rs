//! Data-driven action content and loaders.
//!
//! This crate houses the default action catalog and provides loaders for RON/TOML data files:
//! - Action catalogs, with the reserved ids the engine synthesizes (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Content is consumed through `action_core::ActionOracle` and never appears in player state.
//!
//! All loaders use action-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogFile, CatalogLoader, ConfigLoader, load_default_catalog};
