//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use character_core::{GameConfig, ItemCatalog, VocationTable};
use tracing::info;

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult, VocationLoader};

/// Everything a host needs to build a [`GameEnv`](character_core::GameEnv).
#[derive(Clone, Debug)]
pub struct Content {
    pub config: GameConfig,
    pub items: ItemCatalog,
    pub vocations: VocationTable,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional)
/// ├── items.ron
/// └── vocations.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const ITEMS_FILE: &'static str = "items.ron";
    pub const VOCATIONS_FILE: &'static str = "vocations.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item types from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join(Self::ITEMS_FILE))
    }

    /// Load vocations from `vocations.ron`.
    pub fn load_vocations(&self) -> LoadResult<VocationTable> {
        VocationLoader::load(&self.data_dir.join(Self::VOCATIONS_FILE))
    }

    /// Load every content file in the directory.
    pub fn load(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let items = self.load_items()?;
        let vocations = self.load_vocations()?;

        if let Some(field) = config.divine_empowerment_item
            && items.iter().all(|item| item.id.0 != field)
        {
            anyhow::bail!("divine_empowerment_item {field} is not in {}", Self::ITEMS_FILE);
        }

        info!(
            items = items.len(),
            vocations = vocations.len(),
            dir = %self.data_dir.display(),
            "content loaded"
        );
        Ok(Content {
            config,
            items,
            vocations,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
