//! Durable key/value storage backing the session store.
//!
//! DESIGN
//! ======
//! The store only needs string get/set/remove, so storage is a small trait.
//! `FileStorage` keeps every key in one JSON object on disk and rewrites it
//! through a temp file + rename, so a crash mid-write leaves the previous
//! contents intact. `MemoryStorage` backs tests and throwaway sessions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StoreError;

/// String key/value storage that survives a process restart.
pub trait SessionStorage: Send + Sync {
    /// Read a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON-object file storage. A missing file reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        // An unreadable file is replaced rather than blocking every write.
        let mut entries = self.load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable; starting fresh");
            BTreeMap::new()
        });
        if f(&mut entries) {
            self.save(&entries)?;
        }
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
