//! Unified path management for Fable files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/fable/          # Config directory
//! ├── config.toml           # Application configuration
//! ├── identity.toml         # The authenticated user, if any
//! └── logs/                 # Rolling log files
//!     └── fable.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use fable_core::FableError;

const APP_DIR: &str = "fable";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for FableError {
    fn from(err: PathError) -> Self {
        FableError::config(err.to_string())
    }
}

pub struct FablePaths;

impl FablePaths {
    /// Returns the Fable configuration directory (e.g. `~/.config/fable/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Default location of the persisted identity.
    pub fn identity_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("identity.toml"))
    }

    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
