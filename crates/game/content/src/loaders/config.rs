//! Game configuration loader.

use std::path::Path;

use game_core::{BossConfig, GameConfig};

use crate::loaders::{LoadResult, read_file};

/// Tuning shipped with the crate.
const BUNDLED_CONFIG: &str = include_str!("../../data/config.toml");

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(Self::sanitize(config))
    }

    /// The bundled default configuration.
    pub fn bundled() -> LoadResult<GameConfig> {
        Self::parse(BUNDLED_CONFIG)
    }

    /// Replaces boss settings that cannot work with the defaults.
    fn sanitize(mut config: GameConfig) -> GameConfig {
        let requested = config.boss.spawn_time_sec;
        config.boss.spawn_time_sec = BossConfig::DEFAULT_SPAWN_TIME_SEC;
        config.boss = std::mem::take(&mut config.boss).with_settings(None, Some(requested));
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_matches_defaults() {
        let config = ConfigLoader::bundled().unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_files_keep_defaults() {
        let config = ConfigLoader::parse(
            r#"
            initial_hp = 60
            final_stage = 3

            [boss]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_hp, 60);
        assert_eq!(config.final_stage, Some(3));
        assert!(!config.boss.enabled);
        assert_eq!(config.boss.hp, 150);
        assert_eq!(config.field.width, 800.0);
    }

    #[test]
    fn invalid_boss_time_falls_back() {
        let config = ConfigLoader::parse("[boss]\nspawn_time_sec = -4.0\n").unwrap();
        assert_eq!(config.boss.spawn_time_sec, 20.0);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(ConfigLoader::parse("initial_hp = \"lots\"").is_err());
    }
}
