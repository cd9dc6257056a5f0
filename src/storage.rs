//! Storage layer for taskbox
//!
//! The task list is persisted as one blob under one key in a key-value
//! store. In production the store is a directory with one file per key:
//!
//! ```text
//! <data dir>/
//!   config.toml        # Optional configuration
//!   tasks.json         # Blob for the default key
//!   tasks.json.lock    # Writer lock
//! ```
//!
//! [`StorageAdapter`] pins one key and turns every backend failure into a
//! logged no-op, so callers never have to handle storage errors.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Default storage key for the task list
pub const DEFAULT_KEY: &str = "tasks";

const BLOB_EXTENSION: &str = "json";

/// A persistent string-to-string store
pub trait KeyValueStore: Send {
    /// Read the value under `key`, `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store backed by one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `key`
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{BLOB_EXTENSION}"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        match fs::read_to_string(self.blob_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        lock::write_atomic_locked(
            self.blob_path(key),
            value.as_bytes(),
            DEFAULT_LOCK_TIMEOUT_MS,
        )
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// In-memory key-value store
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// a [`crate::task::TaskStore`] wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .inner()
            .entries
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Current raw value under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner().entries.get(key).cloned()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.inner().writes
    }

    /// Make every read fail, as a disabled browser store would
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner().fail_reads = fail;
    }

    /// Make every write fail, as a full quota would
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner().fail_writes = fail;
    }

    fn inner(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self.inner();
        if inner.fail_reads {
            return Err(Error::OperationFailed("storage is disabled".to_string()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner();
        if inner.fail_writes {
            return Err(Error::OperationFailed("storage quota exceeded".to_string()));
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

/// One fixed key over a [`KeyValueStore`]; write failures are logged and swallowed
pub struct StorageAdapter {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl StorageAdapter {
    pub fn new(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    /// Read the blob; `Ok(None)` means nothing is stored under the key
    pub fn read_raw(&self) -> Result<Option<String>> {
        self.backend.get(&self.key).map_err(|err| {
            tracing::warn!(key = %self.key, error = %err, "failed to read task storage");
            err
        })
    }

    /// Write the blob; returns whether the write landed
    pub fn write_raw(&mut self, blob: &str) -> bool {
        match self.backend.set(&self.key, blob) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to save tasks");
                false
            }
        }
    }
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Check that a storage key is usable as a file stem
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidConfig(
            "storage key cannot be empty".to_string(),
        ));
    }
    if key.starts_with('.') {
        return Err(Error::InvalidConfig(format!(
            "storage key '{key}' cannot start with '.'"
        )));
    }
    if let Some(bad) = key
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')))
    {
        return Err(Error::InvalidConfig(format!(
            "storage key '{key}' contains '{bad}'"
        )));
    }
    Ok(())
}

/// Pick the data directory: an explicit path wins, else the platform default
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    ProjectDirs::from("dev", "taskbox", "taskbox")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            Error::OperationFailed(
                "could not determine a data directory; pass --dir or set TASKBOX_DIR".to_string(),
            )
        })
}
