// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value persistence used to survive process restarts.
//!
//! Values are serialized JSON records. Readers go through [`read_record`],
//! which turns absent or malformed values into `None` so callers can fall
//! back to their defaults instead of failing.
//!
//! Read-modify-write cycles hold a [`StoreLock`] on their key. For a
//! [`FileStore`] that lock is an fs2 exclusive lock on `<key>.lock`, so a
//! `watch` process and one-shot commands sharing a state directory never
//! overwrite each other's updates.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Key holding the endpoint registry.
pub const SERVERS_KEY: &str = "servers";
/// Key holding the emergency configuration.
pub const EMERGENCY_KEY: &str = "emergency";
/// Key holding the offline sync queue.
pub const QUEUE_KEY: &str = "sync_queue";

/// Durable string store keyed by short names.
pub trait KvStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Block until this caller holds `key` exclusively; released on drop.
    ///
    /// Stores only visible to one process can rely on the in-process locks
    /// of their callers and keep this default.
    fn lock(&self, key: &str) -> Result<StoreLock> {
        let _ = key;
        Ok(StoreLock::default())
    }
}

/// Exclusive hold on one key, released when dropped.
#[derive(Debug, Default)]
pub struct StoreLock {
    file: Option<File>,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let _ = FileExt::unlock(file);
        }
    }
}

/// Read and decode a record, degrading to `None` on any failure.
///
/// Read errors and malformed JSON are logged, never returned.
pub fn read_record<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored record, using default");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored record is malformed, using default");
            None
        }
    }
}

/// Encode and store a record.
pub fn write_record<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// File-backed store: one `<key>.json` file per key in a directory.
///
/// Each write goes to its own temporary file that is fsynced and renamed
/// into place, so a crash never leaves a half-written record behind and
/// concurrent writers never share a temp path.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        Self::check_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn lock_path_for(&self, key: &str) -> Result<PathBuf> {
        Self::check_key(key)?;
        Ok(self.dir.join(format!("{}.lock", key)))
    }

    fn check_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::InvalidInput(format!("invalid store key: '{}'", key)));
        }
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn lock(&self, key: &str) -> Result<StoreLock> {
        let path = self.lock_path_for(key)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.lock_exclusive()?;
        Ok(StoreLock { file: Some(file) })
    }
}

/// In-memory store for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still structurally valid.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
