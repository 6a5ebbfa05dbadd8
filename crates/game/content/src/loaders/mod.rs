//! Content loaders for reading game data from files.
//!
//! Loaders convert RON/TOML files into the in-memory oracles defined by
//! character-core ([`ItemCatalog`](character_core::ItemCatalog),
//! [`VocationTable`](character_core::VocationTable)) and into
//! [`GameConfig`](character_core::GameConfig).

pub mod config;
pub mod factory;
pub mod item;
pub mod vocation;

pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use item::ItemLoader;
pub use vocation::VocationLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
