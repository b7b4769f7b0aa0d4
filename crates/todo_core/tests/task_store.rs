use std::cell::Cell;
use std::collections::HashSet;
use todo_core::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, TaskId, TaskPersistence, TaskStore,
    TaskValidationError, TODO_LIST_KEY,
};

/// Store whose writes can be switched off.
#[derive(Default)]
struct ReadOnlyToggleStore {
    inner: MemoryKeyValueStore,
    refuse_writes: Cell<bool>,
}

impl KeyValueStore for ReadOnlyToggleStore {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.refuse_writes.get() {
            return Err(RepoError::Backend("disk full".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> RepoResult<()> {
        self.inner.remove_item(key)
    }
}

fn open(kv: &MemoryKeyValueStore) -> TaskStore<&MemoryKeyValueStore> {
    TaskStore::open(TaskPersistence::new(kv))
}

fn reload(kv: &MemoryKeyValueStore) -> Vec<todo_core::Task> {
    TaskPersistence::new(kv).load()
}

#[test]
fn add_appends_open_task_with_fresh_id() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let mut seen = HashSet::new();

    for title in ["one", "two", " three ", "four"] {
        let task = store.add(title).unwrap();
        let last = store.tasks().last().unwrap();
        assert_eq!(last, &task);
        assert_eq!(last.title, title);
        assert!(!last.completed);
        assert!(seen.insert(task.id.clone()), "id reused: {}", task.id);
    }

    let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["one", "two", " three ", "four"]);
}

#[test]
fn add_blank_title_leaves_collection_and_storage_unchanged() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    store.add("keep").unwrap();
    let before = store.snapshot();
    let stored_before = kv.get_item(TODO_LIST_KEY).unwrap();

    assert_eq!(store.add("").unwrap_err(), TaskValidationError::EmptyTitle);
    assert_eq!(
        store.add("   ").unwrap_err(),
        TaskValidationError::EmptyTitle
    );

    assert_eq!(store.snapshot(), before);
    assert_eq!(kv.get_item(TODO_LIST_KEY).unwrap(), stored_before);
}

#[test]
fn toggle_twice_restores_original_task() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let task = store.add("flip me").unwrap();

    assert!(store.toggle_completed(&task.id));
    assert!(store.get(&task.id).unwrap().completed);
    assert!(store.toggle_completed(&task.id));

    assert_eq!(store.get(&task.id).unwrap(), &task);
}

#[test]
fn remove_is_idempotent() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let keep = store.add("keep").unwrap();
    let dropped = store.add("drop").unwrap();

    assert!(store.remove(&dropped.id));
    assert!(!store.remove(&dropped.id));

    assert_eq!(store.snapshot(), vec![keep]);
}

#[test]
fn update_allows_empty_title() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let task = store.add("original").unwrap();

    assert!(store.update(&task.id, ""));

    let updated = store.get(&task.id).unwrap();
    assert_eq!(updated.title, "");
    assert_eq!(updated.completed, task.completed);
    assert_eq!(updated.created_at, task.created_at);
    assert_eq!(reload(&kv)[0].title, "");
}

#[test]
fn unknown_ids_are_noops() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    store.add("only").unwrap();
    let before = store.snapshot();
    let missing = TaskId::generate();

    assert!(!store.remove(&missing));
    assert!(!store.update(&missing, "x"));
    assert!(!store.toggle_completed(&missing));

    assert_eq!(store.snapshot(), before);
}

#[test]
fn every_mutation_is_persisted() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);

    let task = store.add("persist me").unwrap();
    assert_eq!(reload(&kv), store.snapshot());

    store.toggle_completed(&task.id);
    assert_eq!(reload(&kv), store.snapshot());

    store.update(&task.id, "renamed");
    assert_eq!(reload(&kv), store.snapshot());

    store.remove(&task.id);
    assert!(reload(&kv).is_empty());
    assert_eq!(kv.get_item(TODO_LIST_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn open_loads_previous_session() {
    let kv = MemoryKeyValueStore::new();
    let first = {
        let mut store = open(&kv);
        store.add("a").unwrap();
        store.add("b").unwrap();
        store.snapshot()
    };

    let store = open(&kv);
    assert_eq!(store.snapshot(), first);
    assert_eq!(store.len(), 2);
}

#[test]
fn buy_milk_scenario() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    assert!(store.is_empty());

    let task = store.add("Buy milk").unwrap();
    assert_eq!(store.len(), 1);
    assert!(!store.tasks()[0].completed);

    store.toggle_completed(&task.id);
    assert!(store.tasks()[0].completed);

    store.remove(&task.id);
    assert!(store.is_empty());
}

#[test]
fn failed_writes_keep_in_memory_mutations() {
    let kv = ReadOnlyToggleStore::default();
    let mut store = TaskStore::open(TaskPersistence::new(&kv));
    let kept = store.add("kept").unwrap();

    kv.refuse_writes.set(true);
    let added = store.add("unsaved").unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.tasks()[1], added);

    assert!(store.toggle_completed(&kept.id));
    assert!(store.get(&kept.id).unwrap().completed);

    assert!(store.remove(&added.id));
    assert_eq!(store.len(), 1);

    let persisted = TaskPersistence::new(&kv.inner).load();
    assert_eq!(persisted.len(), 1);
    assert!(!persisted[0].completed);

    kv.refuse_writes.set(false);
    assert!(store.update(&kept.id, "kept and saved"));
    assert_eq!(TaskPersistence::new(&kv.inner).load(), store.snapshot());
    assert!(store.snapshot()[0].completed);
}
