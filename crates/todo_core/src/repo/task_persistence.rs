//! Persistence gateway between the task collection and key-value storage.
//!
//! # Responsibility
//! - Load the persisted collection once at startup.
//! - Write the full collection back after each mutation.
//!
//! # Invariants
//! - `load` and `save` never propagate errors; failures are logged.
//! - A snapshot identical to the last one loaded or written is not rewritten.
//! - Loaded collections never contain duplicate ids.

use crate::model::task::{Task, TaskId};
use crate::repo::kv_store::{KeyValueStore, RepoResult};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::time::Instant;

/// Storage key holding the serialized task collection.
pub const TODO_LIST_KEY: &str = "toDoList";

/// Gateway that mirrors the task collection into a key-value store.
pub struct TaskPersistence<S: KeyValueStore> {
    store: S,
    last_snapshot: Option<String>,
}

impl<S: KeyValueStore> TaskPersistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_snapshot: None,
        }
    }

    /// Loads the collection, degrading to empty on any failure.
    pub fn load(&mut self) -> Vec<Task> {
        let started_at = Instant::now();
        match self.try_load() {
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=repo status=ok count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                tasks
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=repo status=error error_code=tasks_load_failed duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Vec::new()
            }
        }
    }

    /// Loads the collection, returning read and decode failures.
    pub fn try_load(&mut self) -> RepoResult<Vec<Task>> {
        let Some(raw) = self.store.get_item(TODO_LIST_KEY)? else {
            return Ok(Vec::new());
        };

        let decoded: Vec<Task> = serde_json::from_str(&raw)?;
        let tasks = dedupe_by_id(decoded);
        self.last_snapshot = Some(raw);
        Ok(tasks)
    }

    /// Writes the whole collection; failures are logged and swallowed.
    pub fn save(&mut self, tasks: &[Task]) {
        match self.try_save(tasks) {
            Ok(true) => {
                debug!(
                    "event=tasks_save module=repo status=ok count={}",
                    tasks.len()
                );
            }
            Ok(false) => {
                debug!("event=tasks_save module=repo status=skipped reason=unchanged");
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=repo status=error error_code=tasks_save_failed count={} error={err}",
                    tasks.len()
                );
            }
        }
    }

    /// Writes the whole collection.
    ///
    /// Returns `Ok(false)` when the snapshot matches the last one seen and no
    /// write was issued.
    pub fn try_save(&mut self, tasks: &[Task]) -> RepoResult<bool> {
        let snapshot = serde_json::to_string(tasks)?;
        if self.last_snapshot.as_deref() == Some(snapshot.as_str()) {
            return Ok(false);
        }

        self.store.set_item(TODO_LIST_KEY, &snapshot)?;
        self.last_snapshot = Some(snapshot);
        Ok(true)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn dedupe_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    let total = tasks.len();
    let unique: Vec<Task> = tasks
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect();

    if unique.len() != total {
        warn!(
            "event=tasks_load module=repo status=warn reason=duplicate_ids dropped={}",
            total - unique.len()
        );
    }
    unique
}
