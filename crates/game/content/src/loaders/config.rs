//! Game configuration loader.

use std::path::Path;

use character_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Every key is optional; missing keys keep the [`GameConfig::default`]
/// value.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)?;
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &GameConfig) -> LoadResult<()> {
    if !(0.0..=1.0).contains(&config.pvp_damage_share) {
        anyhow::bail!(
            "pvp_damage_share must lie in 0.0..=1.0, got {}",
            config.pvp_damage_share
        );
    }
    if config.unfair_fight_floor > 100 {
        anyhow::bail!(
            "unfair_fight_floor is a percentage, got {}",
            config.unfair_fight_floor
        );
    }
    if usize::from(config.max_blessing) > GameConfig::MAX_BLESSINGS {
        anyhow::bail!(
            "max_blessing {} exceeds the {} tracked blessings",
            config.max_blessing,
            GameConfig::MAX_BLESSINGS
        );
    }
    if config.passive_interval_ms == 0 {
        anyhow::bail!("passive_interval_ms must be positive");
    }
    Ok(())
}
