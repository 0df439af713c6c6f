//! Configuration model (`config.toml`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_MAX_LINES: u32 = 5;
pub const DEFAULT_LOCK_SUNSET_SECS: u64 = 180;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FableConfig {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub identity: IdentitySettings,
    pub game: GameSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    /// Origin the `/api/...` paths are resolved against.
    pub base_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `fable_application=debug`.
    pub level: String,
    /// When set, logs go to a daily-rolling file in this directory instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct IdentitySettings {
    /// Overrides the default `identity.toml` location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Rules for the in-memory engine used offline and in tests.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    pub default_max_lines: u32,
    pub lock_sunset_secs: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            default_max_lines: DEFAULT_MAX_LINES,
            lock_sunset_secs: DEFAULT_LOCK_SUNSET_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: FableConfig = toml::from_str(
            r#"
            [server]
            base_url = "https://stories.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "https://stories.example.com");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.game.default_max_lines, 5);
        assert_eq!(config.game.lock_sunset_secs, 180);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: FableConfig = toml::from_str("").unwrap();
        assert_eq!(config, FableConfig::default());
    }
}
