//! Unified path management for tgpost files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/tgpost/            # Config directory
//! ├── config.toml              # Client configuration
//! └── logs/                    # Application logs
//!     └── tgpost.log.YYYY-MM-DD
//!
//! ~/.local/share/tgpost/       # Data directory
//! └── storage/                 # Durable key/value store (one file per key)
//! ```

use std::path::{Path, PathBuf};
use tgpost_core::TgPostError;

const APP_DIR: &str = "tgpost";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config/data directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for TgPostError {
    fn from(err: PathError) -> Self {
        TgPostError::config(err.to_string())
    }
}

/// Resolved tgpost directories.
///
/// Defaults follow the platform conventions from `dirs`; either root can be
/// overridden (CLI flags, tests).
#[derive(Debug, Clone)]
pub struct TgPostPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl TgPostPaths {
    /// Resolves the platform directories.
    pub fn resolve() -> Result<Self, PathError> {
        let config_dir = dirs::config_dir()
            .ok_or(PathError::HomeDirNotFound)?
            .join(APP_DIR);
        let data_dir = dirs::data_dir()
            .ok_or(PathError::HomeDirNotFound)?
            .join(APP_DIR);
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Uses `root` for both config and data (e.g. a temp dir in tests).
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Directory backing the durable key/value store.
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("storage")
    }
}
