//! Key-value preference storage.
//!
//! The launcher's preference store is an external collaborator; this module
//! only describes what the widget area needs from it. Values are typed, and
//! multi-key writes go through [`PrefBatch`] so a backend can apply them as
//! one unit.

mod file;
mod memory;

pub use file::FilePreferences;
pub use memory::MemoryPreferences;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Preference '{0}' has an unexpected type")]
    TypeMismatch(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A single stored preference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Set(BTreeSet<String>),
}

/// An ordered group of writes applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefBatch {
    writes: Vec<(String, PrefValue)>,
}

impl PrefBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write of any value.
    pub fn set(mut self, key: &str, value: PrefValue) -> Self {
        self.writes.push((key.to_string(), value));
        self
    }

    /// Queue a string write.
    pub fn text(self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, PrefValue::Text(value.into()))
    }

    /// Queue a string-set write.
    pub fn string_set(self, key: &str, value: BTreeSet<String>) -> Self {
        self.set(key, PrefValue::Set(value))
    }

    /// Queue a boolean write.
    pub fn flag(self, key: &str, value: bool) -> Self {
        self.set(key, PrefValue::Bool(value))
    }

    /// Queue an integer write.
    pub fn int(self, key: &str, value: i64) -> Self {
        self.set(key, PrefValue::Int(value))
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Consume the batch, yielding writes in insertion order.
    pub fn into_writes(self) -> impl Iterator<Item = (String, PrefValue)> {
        self.writes.into_iter()
    }
}

/// Trait for preference storage backends.
///
/// Implementations must apply a [`PrefBatch`] atomically: a reader never
/// observes some writes of a batch without the others.
pub trait PreferenceStore: Send + Sync {
    /// Read a raw value.
    fn get(&self, key: &str) -> StorageResult<Option<PrefValue>>;

    /// Apply a batch of writes as one unit.
    fn apply(&self, batch: PrefBatch) -> StorageResult<()>;

    /// Read a string value.
    fn get_text(&self, key: &str) -> StorageResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Text(value)) => Ok(Some(value)),
            Some(_) => Err(StorageError::TypeMismatch(key.to_string())),
        }
    }

    /// Read a string-set value.
    fn get_string_set(&self, key: &str) -> StorageResult<Option<BTreeSet<String>>> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Set(value)) => Ok(Some(value)),
            Some(_) => Err(StorageError::TypeMismatch(key.to_string())),
        }
    }

    /// Read a boolean value.
    fn get_flag(&self, key: &str) -> StorageResult<Option<bool>> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Bool(value)) => Ok(Some(value)),
            Some(_) => Err(StorageError::TypeMismatch(key.to_string())),
        }
    }

    /// Read an integer value.
    fn get_int(&self, key: &str) -> StorageResult<Option<i64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Int(value)) => Ok(Some(value)),
            Some(_) => Err(StorageError::TypeMismatch(key.to_string())),
        }
    }

    /// Write a single value.
    fn put(&self, key: &str, value: PrefValue) -> StorageResult<()> {
        self.apply(PrefBatch::new().set(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let batch = PrefBatch::new().text("a", "1").flag("b", true).int("a", 2);
        let writes: Vec<_> = batch.into_writes().collect();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[0], ("a".to_string(), PrefValue::Text("1".to_string())));
        assert_eq!(writes[2], ("a".to_string(), PrefValue::Int(2)));
    }

    #[test]
    fn test_typed_getters_reject_other_types() {
        let prefs = MemoryPreferences::new();
        prefs.put("flag", PrefValue::Bool(true)).unwrap();

        assert_eq!(prefs.get_flag("flag").unwrap(), Some(true));
        assert!(matches!(prefs.get_text("flag"), Err(StorageError::TypeMismatch(_))));
        assert_eq!(prefs.get_text("missing").unwrap(), None);
    }

    #[test]
    fn test_value_json_shape() {
        let set: BTreeSet<String> = ["3".to_string(), "5".to_string()].into_iter().collect();
        let json = serde_json::to_string(&PrefValue::Set(set.clone())).unwrap();
        assert_eq!(json, r#"["3","5"]"#);
        let back: PrefValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PrefValue::Set(set));

        let back: PrefValue = serde_json::from_str("true").unwrap();
        assert_eq!(back, PrefValue::Bool(true));
        let back: PrefValue = serde_json::from_str("2").unwrap();
        assert_eq!(back, PrefValue::Int(2));
    }
}
