//! Core domain logic for the to-do list app.
//! This crate is the single source of truth for task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use repo::task_persistence::{TaskPersistence, TODO_LIST_KEY};
pub use service::task_store::TaskStore;
pub use service::todo_screen::{
    EditSession, Notification, ScreenEvent, ScreenView, TaskRow, TodoScreen,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
