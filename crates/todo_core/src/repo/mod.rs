//! Persistence layer: key-value storage and the task snapshot gateway.
//!
//! # Responsibility
//! - Define the device key-value contract and its SQLite implementation.
//! - Bridge the in-memory task collection to one fixed storage key.
//!
//! # Invariants
//! - The task collection is always written as one full snapshot.
//! - Reading storage never hands back an invalid task.

pub mod kv_store;
pub mod task_persistence;
