//! Client-side persistent key/value storage.
//!
//! The storefront keeps exactly one persisted value, the bearer token under
//! [`TOKEN_KEY`]. [`FileStorage`] keeps every key in one JSON object on disk;
//! [`MemoryStorage`] is the in-process equivalent used by tests and
//! throwaway sessions.
//!
//! Storage is read on every access. Nothing is cached in memory by
//! [`FileStorage`], so a token written by one command is visible to the next.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Key the bearer token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Read the bearer token, treating an empty value as absent.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub fn read_token(storage: &dyn Storage) -> Result<Option<SecretString>, StorageError> {
    Ok(storage
        .get_item(TOKEN_KEY)?
        .filter(|token| !token.trim().is_empty())
        .map(SecretString::from))
}

/// Persist the bearer token.
///
/// # Errors
///
/// Returns an error if storage cannot be written.
pub fn write_token(storage: &dyn Storage, token: &SecretString) -> Result<(), StorageError> {
    storage.set_item(TOKEN_KEY, token.expose_secret())
}

/// Discard the bearer token.
///
/// # Errors
///
/// Returns an error if storage cannot be written.
pub fn clear_token(storage: &dyn Storage) -> Result<(), StorageError> {
    storage.remove_item(TOKEN_KEY)
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage backed by a JSON file.
///
/// A missing file reads as empty; it is created (with parent directories) on
/// the first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let contents = serde_json::to_string_pretty(items)?;

        // Readers only ever see a complete file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a bearer token.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let storage = Self::new();
        storage
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TOKEN_KEY.to_string(), token.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("storage.json"));

        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert!(read_token(&storage).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_round_trip_survives_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        write_token(&FileStorage::new(&path), &SecretString::from("abc123")).unwrap();

        let reopened = FileStorage::new(&path);
        let token = read_token(&reopened).unwrap().unwrap();
        assert_eq!(token.expose_secret(), "abc123");
    }

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));

        storage.set_item("theme", "dark").unwrap();
        write_token(&storage, &SecretString::from("abc123")).unwrap();
        clear_token(&storage).unwrap();

        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert!(read_token(&storage).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let result = FileStorage::new(&path).get_item(TOKEN_KEY);
        assert!(matches!(result, Err(StorageError::Json(_))));
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));
        assert!(clear_token(&storage).is_ok());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_blank_token_reads_as_absent() {
        let storage = MemoryStorage::with_token("   ");
        assert!(read_token(&storage).unwrap().is_none());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::with_token("t0k");
        assert_eq!(
            read_token(&storage).unwrap().unwrap().expose_secret(),
            "t0k"
        );

        clear_token(&storage).unwrap();
        assert!(read_token(&storage).unwrap().is_none());
    }
}
