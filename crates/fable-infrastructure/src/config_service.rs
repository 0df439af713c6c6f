//! Configuration service implementation.
//!
//! Loads `FableConfig` from `~/.config/fable/config.toml` and applies
//! environment overrides on top.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use fable_core::Result;
use fable_core::config::FableConfig;

use crate::paths::FablePaths;
use crate::storage::AtomicTomlFile;

pub const SERVER_URL_ENV: &str = "FABLE_SERVER_URL";
pub const LOG_LEVEL_ENV: &str = "FABLE_LOG_LEVEL";

/// Loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<FableConfig>>>,
}

impl ConfigService {
    /// Uses the default config location. Loading is lazy.
    pub fn new() -> Self {
        Self {
            path: FablePaths::config_file().ok(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// A missing file yields defaults; an unreadable one is logged and also
    /// yields defaults. Environment overrides apply either way.
    pub fn get_config(&self) -> FableConfig {
        if let Ok(read_lock) = self.config.read()
            && let Some(ref cached) = *read_lock
        {
            return cached.clone();
        }

        let loaded = match self.load_file() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config from {:?}: {}", self.path, e);
                FableConfig::default()
            }
        };
        let loaded = apply_env_overrides(loaded, |key| std::env::var(key).ok());

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_file(&self) -> Result<FableConfig> {
        let Some(path) = &self.path else {
            return Ok(FableConfig::default());
        };
        Ok(AtomicTomlFile::<FableConfig>::new(path.clone())
            .load()?
            .unwrap_or_default())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `FABLE_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(mut config: FableConfig, lookup: F) -> FableConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(SERVER_URL_ENV).filter(|value| !value.trim().is_empty()) {
        config.server.base_url = url;
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|value| !value.trim().is_empty()) {
        config.logging.level = level;
    }
    config
}
