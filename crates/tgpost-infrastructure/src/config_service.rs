//! Configuration service implementation.
//!
//! Loads the client configuration from `config.toml`, writing a default file
//! on first run.

use crate::storage::AtomicFile;
use std::path::{Path, PathBuf};
use tgpost_core::config::ClientConfig;
use tgpost_core::error::{Result, TgPostError};

#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicFile,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Loads the configuration, creating the file with defaults if missing.
    ///
    /// A present but malformed file is an error; it is never overwritten.
    pub fn load(&self) -> Result<ClientConfig> {
        match self.file.read()? {
            Some(content) => toml::from_str(&content).map_err(|e| {
                TgPostError::config(format!(
                    "Failed to parse {}: {}",
                    self.path().display(),
                    e
                ))
            }),
            None => {
                let config = ClientConfig::default();
                tracing::info!(
                    "[ConfigService] Creating default config at {}",
                    self.path().display()
                );
                self.save(&config)?;
                Ok(config)
            }
        }
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let content = toml::to_string_pretty(config)?;
        self.file.write(&content)
    }
}
