//! Task store: the single source of truth for the task collection.
//!
//! # Responsibility
//! - Hold the ordered collection and apply add/update/toggle/remove.
//! - Persist the full collection right after each mutation.
//!
//! # Invariants
//! - Insertion order is preserved; there is no reordering.
//! - Ids are unique within the collection.
//! - Operations on unknown ids are no-ops and do not write.
//! - A failed save never rolls back the in-memory mutation.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::kv_store::KeyValueStore;
use crate::repo::task_persistence::TaskPersistence;
use log::{debug, info};

/// In-memory ordered task collection backed by a persistence gateway.
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    persistence: TaskPersistence<S>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Loads the persisted collection and returns a ready store.
    ///
    /// This is the only load; later mutations only write.
    pub fn open(mut persistence: TaskPersistence<S>) -> Self {
        let tasks = persistence.load();
        Self { tasks, persistence }
    }

    /// Appends a new open task.
    ///
    /// # Errors
    /// - `EmptyTitle` for empty or whitespace-only titles; nothing changes
    ///   and nothing is written.
    pub fn add(&mut self, title: impl Into<String>) -> Result<Task, TaskValidationError> {
        let task = match Task::new(title) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_add module=service status=rejected reason={err}");
                return Err(err);
            }
        };

        self.tasks.push(task.clone());
        info!("event=task_add module=service status=ok id={}", task.id);
        self.persist();
        Ok(task)
    }

    /// Removes the task with `id`. Returns whether a task was removed.
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=task_remove module=service status=noop id={id}");
            return false;
        };

        self.tasks.remove(index);
        info!("event=task_remove module=service status=ok id={id}");
        self.persist();
        true
    }

    /// Replaces the title of the task with `id`.
    ///
    /// The new title is stored as given, including empty text.
    pub fn update(&mut self, id: &TaskId, new_title: impl Into<String>) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=task_update module=service status=noop id={id}");
            return false;
        };

        self.tasks[index].rename(new_title);
        info!("event=task_update module=service status=ok id={id}");
        self.persist();
        true
    }

    /// Flips the completion flag of the task with `id`.
    pub fn toggle_completed(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=task_toggle module=service status=noop id={id}");
            return false;
        };

        let task = &mut self.tasks[index];
        task.toggle();
        info!(
            "event=task_toggle module=service status=ok id={id} completed={}",
            task.completed
        );
        self.persist();
        true
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Current collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Owned copy of the current collection.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn persistence(&self) -> &TaskPersistence<S> {
        &self.persistence
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn persist(&mut self) {
        self.persistence.save(&self.tasks);
    }
}
