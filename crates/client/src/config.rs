//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

/// Configuration required to load content and run one battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Roster file overriding the data directory's `roster.ron`.
    pub roster_path: Option<PathBuf>,
    /// Config file overriding the data directory's `config.toml`.
    pub config_path: Option<PathBuf>,
    /// Content directory (default: the bundled content).
    pub data_dir: Option<PathBuf>,
    /// Log root (default: platform cache directory).
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
    pub event_buffer: Option<usize>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_ROSTER` - Roster RON file
    /// - `BATTLE_CONFIG` - Battle config TOML file
    /// - `BATTLE_DATA_DIR` - Content directory holding both files
    /// - `BATTLE_LOG_DIR` - Root directory for session logs
    /// - `BATTLE_SESSION_ID` - Session identifier (default: auto-generated)
    /// - `BATTLE_EVENT_BUFFER` - Events buffered per topic (default: 256)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        Self {
            roster_path: path("BATTLE_ROSTER"),
            config_path: path("BATTLE_CONFIG"),
            data_dir: path("BATTLE_DATA_DIR"),
            log_dir: path("BATTLE_LOG_DIR"),
            session_id: lookup("BATTLE_SESSION_ID").filter(|v| !v.is_empty()),
            event_buffer: read_value::<usize>(&lookup, "BATTLE_EVENT_BUFFER").map(|n| n.max(1)),
        }
    }
}

fn read_value<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]), ClientConfig::default());
    }

    #[test]
    fn reads_paths_and_session() {
        let config = config(&[
            ("BATTLE_ROSTER", "arena/roster.ron"),
            ("BATTLE_LOG_DIR", "/var/log/battle"),
            ("BATTLE_SESSION_ID", "duel-1"),
        ]);

        assert_eq!(config.roster_path, Some(PathBuf::from("arena/roster.ron")));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/battle")));
        assert_eq!(config.session_id.as_deref(), Some("duel-1"));
        assert_eq!(config.config_path, None);
    }

    #[test]
    fn event_buffer_is_parsed_and_floored() {
        assert_eq!(config(&[("BATTLE_EVENT_BUFFER", " 64 ")]).event_buffer, Some(64));
        assert_eq!(config(&[("BATTLE_EVENT_BUFFER", "0")]).event_buffer, Some(1));
        assert_eq!(config(&[("BATTLE_EVENT_BUFFER", "lots")]).event_buffer, None);
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = config(&[("BATTLE_CONFIG", ""), ("BATTLE_SESSION_ID", "")]);
        assert_eq!(config.config_path, None);
        assert_eq!(config.session_id, None);
    }
}
