//! File-based preference storage for native platforms.

use super::{PrefBatch, PrefValue, PreferenceStore, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// File-based preferences.
///
/// All values live in a single JSON document. Every batch rewrites the whole
/// document through a temporary file and a rename, so a crash mid-write
/// leaves either the old or the new document on disk.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: RwLock<BTreeMap<String, PrefValue>>,
}

impl FilePreferences {
    /// Open preferences stored at `path`.
    ///
    /// Creates the parent directory if it doesn't exist. A missing file is an
    /// empty store; an unreadable or corrupt one is an error.
    pub fn open(path: PathBuf) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("Failed to create preferences directory: {}", e))
                })?;
            }
        }

        let values = if path.exists() {
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Open preferences in the default location.
    ///
    /// On Unix: `~/.local/share/dockyard/preferences.json`
    /// On Windows: `%LOCALAPPDATA%\dockyard\preferences.json`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::open(base.join("dockyard").join("preferences.json"))
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, values: &BTreeMap<String, PrefValue>) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            StorageError::Io(format!("Failed to replace {}: {}", self.path.display(), e))
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> StorageResult<Option<PrefValue>> {
        let values = self
            .values
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn apply(&self, batch: PrefBatch) -> StorageResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;

        let mut next = values.clone();
        for (key, value) in batch.into_writes() {
            next.insert(key, value);
        }

        // Only publish the new values once they are on disk.
        self.write_document(&next)?;
        *values = next;
        Ok(())
    }
}
