//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`BattleConfig::default`]; the result is
    /// validated before it is returned.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid battle config: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_uses_defaults() {
        let config = ConfigLoader::parse("distance = 5000.0\n").unwrap();
        assert_eq!(config.distance, 5000.0);
        assert_eq!(config.round_action_value, BattleConfig::DEFAULT_ROUND_ACTION_VALUE);
        assert_eq!(config.max_rounds, BattleConfig::DEFAULT_MAX_ROUNDS);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = ConfigLoader::parse("round_action_value = -5.0\n").unwrap_err();
        assert!(err.to_string().contains("Invalid battle config"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_rounds = 3\n").unwrap();

        let config = ConfigLoader::load(&path).unwrap();

        assert_eq!(config.max_rounds, 3);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
