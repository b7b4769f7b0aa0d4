//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todo_core` linkage without the Flutter/FFI runtime.
//! - Run one add/toggle/remove pass against an in-memory store.

use todo_core::{MemoryKeyValueStore, TaskPersistence, TaskStore};

fn main() {
    println!("todo_core ping={}", todo_core::ping());
    println!("todo_core version={}", todo_core::core_version());

    let kv = MemoryKeyValueStore::new();
    let mut store = TaskStore::open(TaskPersistence::new(&kv));

    match store.add("smoke task") {
        Ok(task) => {
            println!("todo_core add count={}", store.len());
            store.toggle_completed(&task.id);
            let completed = store.get(&task.id).is_some_and(|task| task.completed);
            println!("todo_core toggle completed={completed}");
            store.remove(&task.id);
            println!("todo_core remove count={}", store.len());
        }
        Err(err) => {
            eprintln!("todo_core add failed: {err}");
            std::process::exit(1);
        }
    }
}
