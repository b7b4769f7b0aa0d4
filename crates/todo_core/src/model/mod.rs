//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, persistence and UI.
//!
//! # Invariants
//! - Every task is identified by a stable, non-empty `TaskId`.
//! - Task ids are unique within one collection.

pub mod task;
