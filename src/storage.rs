use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::Task;

/// Error type for persisting tasks
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable home of the task list.
pub trait TaskStore {
    /// Loads every stored task. A missing or unreadable store reads as empty.
    fn load(&self) -> Vec<Task>;
    /// Replaces the stored list with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;
}

/// Tasks kept as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }
        let mut f = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot open task store");
                return Vec::new();
            }
        };
        let mut s = String::new();
        if let Err(e) = f.read_to_string(&mut s) {
            warn!(path = %self.path.display(), error = %e, "cannot read task store");
            return Vec::new();
        }
        let records = match serde_json::from_str::<Vec<Value>>(&s) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "task store is malformed; starting empty");
                return Vec::new();
            }
        };
        let tasks: Vec<Task> = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value::<Task>(record) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!(path = %self.path.display(), index = i, error = %e, "skipping malformed task record");
                    None
                }
            })
            .collect();
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        tasks
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let s = serde_json::to_string_pretty(tasks)?;
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(write_err)?;
        f.write_all(s.as_bytes()).map_err(write_err)?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RefCell<Vec<Task>>,
}

impl MemoryStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RefCell::new(tasks),
        }
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        *self.tasks.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntervalUnit;
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Vec<Task> {
        let now = Local.with_ymd_and_hms(2022, 4, 1, 13, 27, 41).earliest().unwrap();
        let due = Local.with_ymd_and_hms(2022, 4, 20, 18, 0, 0).earliest().unwrap();
        vec![
            Task::recurring("1f0c".into(), "Water plants".into(), 5, IntervalUnit::Days, None, &now),
            Task::recurring("77ab".into(), "Change filter".into(), 1, IntervalUnit::Months, None, &now),
            Task::one_shot("9d2e".into(), "Renew passport".into(), due, &now),
        ]
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("tasks.json"));
        let tasks = sample();
        store.save(&tasks).unwrap();
        assert_eq!(store.load(), tasks);
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/tasks.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load().len(), 3);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "not json {{{").unwrap();
        assert!(JsonFileStore::new(path).load().is_empty());
    }

    #[test]
    fn bad_records_are_skipped_individually() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[
                {"id": "a", "title": "Fine", "dueDate": "2022-04-06T00:00:00Z", "interval": 5},
                {"id": "b", "title": "No date", "interval": 5},
                {"id": "c", "title": "Bad date", "dueDate": "next week", "interval": 5},
                {"id": "d", "title": "Also fine", "dueDate": "2022-04-09T00:00:00Z", "interval": 2}
            ]"#,
        )
        .unwrap();
        let ids: Vec<String> = JsonFileStore::new(path).load().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(store.save(&sample()), Err(StoreError::Write { .. })));
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::default();
        store.save(&sample()).unwrap();
        assert_eq!(store.load(), sample());
    }
}
