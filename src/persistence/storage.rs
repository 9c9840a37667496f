//! Key/value storage backends.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use mockall::automock;
use rustc_hash::FxHashMap;

use super::PersistenceError;

/// String key/value storage that outlives a kiosk session.
#[automock]
pub trait Storage: Send + Sync {
    /// Read a value; `None` when the key was never written or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove a value. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Storage holding one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the values live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory storage, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let values = self
            .values
            .lock()
            .map_err(|_poisoned| PersistenceError::Poisoned)?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_poisoned| PersistenceError::Poisoned)?;

        values.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_poisoned| PersistenceError::Poisoned)?;

        values.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn file_storage_round_trips_values() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get("panier")?, None);

        storage.set("panier", "[]")?;

        assert_eq!(storage.get("panier")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn file_storage_remove_missing_key_succeeds() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::new(dir.path());

        storage.remove("panier")?;
        storage.set("panier", "[]")?;
        storage.remove("panier")?;

        assert_eq!(storage.get("panier")?, None);

        Ok(())
    }

    #[test]
    fn memory_storage_overwrites_and_removes() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set("SPouAEstorage", "Sur place")?;
        storage.set("SPouAEstorage", "À emporter")?;

        assert_eq!(storage.get("SPouAEstorage")?.as_deref(), Some("À emporter"));

        storage.remove("SPouAEstorage")?;

        assert_eq!(storage.get("SPouAEstorage")?, None);

        Ok(())
    }
}
