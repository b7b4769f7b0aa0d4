//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the to-do screen operations to Dart via FRB.
//! - Convert every core error into a plain message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call loads the collection, applies one operation and persists it;
//!   no task state lives in process globals.

use log::warn;
use todo_core::db::open_db;
use todo_core::service::todo_screen::{
    EMPTY_LIST_FALLBACK, EMPTY_TITLE_ALERT_MESSAGE, EMPTY_TITLE_ALERT_TITLE,
};
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    SqliteKeyValueStore, TaskId, TaskPersistence, TaskRow, TaskStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "todo_list.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Exposes core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the database file used by every later call.
///
/// # FFI contract
/// - Must be called before the first data call to take effect.
/// - Returns empty string on success; an error message when the path is
///   empty or storage was already configured with a different path.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_storage(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "storage already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// `Done` or `In Progress`.
    pub status_label: String,
    /// `Created on: M/D/YYYY`.
    pub created_on: String,
}

/// Full collection for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub items: Vec<TodoItem>,
    /// Empty-state message, set only when `items` is empty.
    pub fallback: Option<String>,
    /// Diagnostic message; empty on success.
    pub message: String,
}

/// Result envelope for one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    pub ok: bool,
    /// Affected task id, when one exists.
    pub task_id: Option<String>,
    /// Alert title to show, set only for user-facing validation failures.
    pub alert_title: Option<String>,
    pub message: String,
    /// Collection after the call.
    pub items: Vec<TodoItem>,
}

impl TodoActionResponse {
    fn success(message: impl Into<String>, task_id: String, items: Vec<TodoItem>) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id),
            alert_title: None,
            message: message.into(),
            items,
        }
    }

    fn failure(message: impl Into<String>, items: Vec<TodoItem>) -> Self {
        Self {
            ok: false,
            task_id: None,
            alert_title: None,
            message: message.into(),
            items,
        }
    }
}

/// Returns the current task collection.
///
/// # FFI contract
/// - Sync call, DB-backed.
/// - Storage failures yield an empty list plus a diagnostic message.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list() -> TodoListResponse {
    match with_task_store(|store| items_of(store)) {
        Ok(items) => TodoListResponse {
            fallback: items.is_empty().then(|| EMPTY_LIST_FALLBACK.to_string()),
            items,
            message: String::new(),
        },
        Err(err) => TodoListResponse {
            items: Vec::new(),
            fallback: Some(EMPTY_LIST_FALLBACK.to_string()),
            message: format!("todo_list failed: {err}"),
        },
    }
}

/// Adds a task from the input field.
///
/// # FFI contract
/// - Blank titles fail with `alert_title`/`message` set to the alert the UI
///   must show.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(title: String) -> TodoActionResponse {
    let outcome = with_task_store(|store| {
        let result = store.add(title).map(|task| task.id.to_string());
        (result, items_of(store))
    });

    match outcome {
        Ok((Ok(task_id), items)) => TodoActionResponse::success("Task added.", task_id, items),
        Ok((Err(_), items)) => TodoActionResponse {
            alert_title: Some(EMPTY_TITLE_ALERT_TITLE.to_string()),
            ..TodoActionResponse::failure(EMPTY_TITLE_ALERT_MESSAGE, items)
        },
        Err(err) => TodoActionResponse::failure(format!("todo_add failed: {err}"), Vec::new()),
    }
}

/// Deletes a task; unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(id: String) -> TodoActionResponse {
    mutate("todo_delete", "Task deleted.", id, |store, task_id| {
        store.remove(task_id)
    })
}

/// Flips a task's completion flag; unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(id: String) -> TodoActionResponse {
    mutate("todo_toggle", "Task toggled.", id, |store, task_id| {
        store.toggle_completed(task_id)
    })
}

/// Saves an edited title. Empty titles are accepted.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_update(id: String, title: String) -> TodoActionResponse {
    mutate("todo_update", "Task updated.", id, move |store, task_id| {
        store.update(task_id, title)
    })
}

type SqliteTaskStore<'conn> = TaskStore<SqliteKeyValueStore<'conn>>;

fn mutate(
    op: &'static str,
    ok_message: &'static str,
    id: String,
    apply: impl FnOnce(&mut SqliteTaskStore<'_>, &TaskId) -> bool,
) -> TodoActionResponse {
    let task_id = match TaskId::parse(id) {
        Ok(task_id) => task_id,
        Err(err) => return TodoActionResponse::failure(format!("{op} failed: {err}"), Vec::new()),
    };

    let outcome = with_task_store(|store| {
        let changed = apply(store, &task_id);
        (changed, items_of(store))
    });

    match outcome {
        Ok((changed, items)) => {
            let message = if changed { ok_message } else { "No matching task." };
            TodoActionResponse::success(message, task_id.to_string(), items)
        }
        Err(err) => TodoActionResponse::failure(format!("{op} failed: {err}"), Vec::new()),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| std::env::temp_dir().join(DB_FILE_NAME))
        .clone()
}

fn with_task_store<T>(f: impl FnOnce(&mut SqliteTaskStore<'_>) -> T) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("storage open failed: {err}"))?;
    let kv = SqliteKeyValueStore::try_new(&conn).map_err(|err| {
        warn!("event=ffi_store_init module=ffi status=error error={err}");
        format!("storage init failed: {err}")
    })?;
    let mut store = TaskStore::open(TaskPersistence::new(kv));
    Ok(f(&mut store))
}

fn items_of(store: &SqliteTaskStore<'_>) -> Vec<TodoItem> {
    store
        .tasks()
        .iter()
        .map(|task| to_todo_item(TaskRow::from(task)))
        .collect()
}

fn to_todo_item(row: TaskRow) -> TodoItem {
    TodoItem {
        id: row.id.to_string(),
        title: row.title,
        completed: row.completed,
        status_label: row.status_label.to_string(),
        created_on: row.created_on,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_storage, core_version, init_logging, ping, todo_add, todo_delete, todo_list,
        todo_toggle, todo_update,
    };
    use std::sync::{Mutex, MutexGuard};

    // Every data call rewrites the whole snapshot, so tests sharing the
    // entry database must not interleave.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    fn lock_db() -> MutexGuard<'static, ()> {
        DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unique_title(prefix: &str) -> String {
        format!("{prefix}-{}", uuid_like())
    }

    fn uuid_like() -> String {
        todo_core::TaskId::generate().to_string()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn configure_storage_rejects_empty_path() {
        assert!(!configure_storage("  ".to_string()).is_empty());
    }

    #[test]
    fn add_toggle_update_delete_flow() {
        let _guard = lock_db();
        let title = unique_title("ffi-flow");
        let added = todo_add(title.clone());
        assert!(added.ok, "{}", added.message);
        let id = added.task_id.clone().expect("add returns task id");
        let row = added
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("added task listed");
        assert_eq!(row.title, title);
        assert_eq!(row.status_label, "In Progress");

        let toggled = todo_toggle(id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        let row = toggled.items.iter().find(|item| item.id == id).unwrap();
        assert!(row.completed);
        assert_eq!(row.status_label, "Done");

        let updated = todo_update(id.clone(), String::new());
        assert!(updated.ok, "{}", updated.message);
        let row = updated.items.iter().find(|item| item.id == id).unwrap();
        assert_eq!(row.title, "");

        let deleted = todo_delete(id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(deleted.items.iter().all(|item| item.id != id));
        assert!(todo_list().items.iter().all(|item| item.id != id));
    }

    #[test]
    fn add_blank_title_returns_alert() {
        let _guard = lock_db();
        let response = todo_add("   ".to_string());
        assert!(!response.ok);
        assert_eq!(response.alert_title.as_deref(), Some("Error"));
        assert_eq!(response.message, "Empty Task Cannot Be added");
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let _guard = lock_db();
        let response = todo_delete(uuid_like());
        assert!(response.ok);
        assert_eq!(response.message, "No matching task.");
    }

    #[test]
    fn empty_id_is_rejected() {
        let response = todo_toggle(String::new());
        assert!(!response.ok);
    }
}
