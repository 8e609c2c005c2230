//! Directory-backed key/value store.

use super::atomic_file::AtomicFile;
use std::path::{Path, PathBuf};
use tgpost_core::error::{Result, TgPostError};
use tgpost_core::storage::KeyValueStore;

/// Stores each key as one file inside `dir`.
///
/// Keys map to file names verbatim, so only ASCII letters, digits, `.`, `-`
/// and `_` are accepted.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(TgPostError::config(format!("Invalid storage key: '{}'", key)));
        }
        Ok(AtomicFile::new(self.dir.join(key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.file_for(key)?.read()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        tracing::trace!("[FileKeyValueStore] set {} ({} bytes)", key, value.len());
        self.file_for(key)?.write(value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.file_for(key)?.remove()
    }
}
