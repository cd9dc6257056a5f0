//! Task list for taskbox.
//!
//! The list lives in memory as an ordered `Vec<TaskRecord>` and is mirrored
//! to storage after every mutation as a JSON array of
//! `{"text": ..., "completed": ...}` objects. Record ids are generated when
//! a record enters the list and are never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::storage::StorageAdapter;

/// Session-local identity of a task record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(Ulid);

impl TaskId {
    fn generate() -> Self {
        Self(Ulid::new())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl TaskRecord {
    fn new(text: String, completed: bool) -> Self {
        Self {
            id: TaskId::generate(),
            text,
            completed,
        }
    }
}

#[derive(Serialize)]
struct StoredTaskRef<'a> {
    text: &'a str,
    completed: bool,
}

#[derive(Deserialize)]
struct StoredTask {
    text: String,
    #[serde(default)]
    completed: bool,
}

/// Result of decoding a persistence blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTasks {
    pub tasks: Vec<TaskRecord>,
    /// Array elements that were not usable task records
    pub skipped: usize,
}

/// What [`TaskStore::load_from_storage`] found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet
    Absent,
    /// Storage could not be read; the list starts empty
    Unreadable,
    /// Blob was not a JSON array; the list was reset to empty
    Corrupt,
    Loaded { count: usize, skipped: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub open: usize,
    pub completed: usize,
}

/// Encode records as the persistence blob
pub fn serialize_tasks(tasks: &[TaskRecord]) -> Result<String> {
    let stored: Vec<StoredTaskRef<'_>> = tasks
        .iter()
        .map(|task| StoredTaskRef {
            text: &task.text,
            completed: task.completed,
        })
        .collect();
    Ok(serde_json::to_string(&stored)?)
}

/// Decode a persistence blob.
///
/// Fails only when the blob is not a JSON array. Elements without a string
/// `text`, or whose text is blank, are skipped.
pub fn deserialize_tasks(blob: &str) -> Result<ParsedTasks> {
    let values: Vec<serde_json::Value> = serde_json::from_str(blob)?;
    let mut tasks = Vec::with_capacity(values.len());
    let mut skipped = 0;
    for value in values {
        match serde_json::from_value::<StoredTask>(value) {
            Ok(stored) if !stored.text.trim().is_empty() => {
                tasks.push(TaskRecord::new(stored.text, stored.completed));
            }
            _ => skipped += 1,
        }
    }
    Ok(ParsedTasks { tasks, skipped })
}

/// The in-memory task list and its storage
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<TaskRecord>,
    storage: StorageAdapter,
}

impl TaskStore {
    /// Empty store; call [`TaskStore::load_from_storage`] to restore
    pub fn new(storage: StorageAdapter) -> Self {
        Self {
            tasks: Vec::new(),
            storage,
        }
    }

    /// Store restored from `storage`
    pub fn open(storage: StorageAdapter) -> (Self, LoadOutcome) {
        let mut store = Self::new(storage);
        let outcome = store.load_from_storage();
        (store, outcome)
    }

    pub fn storage(&self) -> &StorageAdapter {
        &self.storage
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        self.tasks.get(index).map(|task| task.id)
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        TaskCounts {
            open: self.tasks.len() - completed,
            completed,
        }
    }

    /// Append a new open task with trimmed `text`
    pub fn add(&mut self, text: &str) -> Result<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyTask);
        }
        let record = TaskRecord::new(text.to_string(), false);
        let id = record.id;
        self.tasks.push(record);
        tracing::debug!(%id, "task added");
        self.persist();
        Ok(id)
    }

    /// Replace the text of `id`.
    ///
    /// Blank or unchanged text is a cancel: returns `false` and writes
    /// nothing.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> bool {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return false;
        }
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };
        if task.text == new_text {
            return false;
        }
        task.text = new_text.to_string();
        tracing::debug!(%id, "task edited");
        self.persist();
        true
    }

    /// Flip completion of `id`, returning the new state
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        tracing::debug!(%id, completed, "task toggled");
        self.persist();
        Some(completed)
    }

    /// Remove `id` from the list
    pub fn delete(&mut self, id: TaskId) -> Option<TaskRecord> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index);
        tracing::debug!(%id, "task deleted");
        self.persist();
        Some(removed)
    }

    /// Replace the list with whatever storage holds
    pub fn load_from_storage(&mut self) -> LoadOutcome {
        let blob = match self.storage.read_raw() {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                self.tasks.clear();
                return LoadOutcome::Absent;
            }
            Err(_) => {
                self.tasks.clear();
                return LoadOutcome::Unreadable;
            }
        };
        match deserialize_tasks(&blob) {
            Ok(parsed) => {
                if parsed.skipped > 0 {
                    tracing::warn!(skipped = parsed.skipped, "skipped malformed stored tasks");
                }
                let count = parsed.tasks.len();
                self.tasks = parsed.tasks;
                LoadOutcome::Loaded {
                    count,
                    skipped: parsed.skipped,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored tasks are corrupt; starting empty");
                self.tasks.clear();
                LoadOutcome::Corrupt
            }
        }
    }

    /// Write the full list to storage; returns whether it landed
    pub fn persist(&mut self) -> bool {
        let blob = match serialize_tasks(&self.tasks) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode tasks");
                return false;
            }
        };
        self.storage.write_raw(&blob)
    }
}
