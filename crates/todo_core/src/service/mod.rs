//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory task collection and its mutations.
//! - Translate UI events into store calls and render-ready view data.
//!
//! # Invariants
//! - Every successful mutation is followed by one explicit snapshot save.
//! - Services stay storage-agnostic behind `KeyValueStore`.

pub mod task_store;
pub mod todo_screen;
