//! Screen controller for the single to-do screen.
//!
//! # Responsibility
//! - Hold UI-only state: the add-input buffer and the edit session.
//! - Map UI events onto `TaskStore` operations.
//! - Produce render-ready view data for the UI toolkit.
//!
//! # Invariants
//! - At most one edit session exists at a time.
//! - The add-input buffer is cleared after every submission attempt.
//! - Edit saves do not check for an empty title.

use crate::model::task::{Task, TaskId};
use crate::repo::kv_store::KeyValueStore;
use crate::service::task_store::TaskStore;

pub const SCREEN_HEADING: &str = "Add Tasks";
pub const INPUT_PLACEHOLDER: &str = "Add Your Next Task";
pub const ADD_BUTTON_LABEL: &str = "Add";
pub const EDIT_MODAL_TITLE: &str = "Edit Task Title:";
pub const EDIT_INPUT_PLACEHOLDER: &str = "Edit Task Title";
pub const EDIT_SAVE_LABEL: &str = "Save";
pub const EMPTY_LIST_FALLBACK: &str = "Once you add some tasks they will be displayed here.";
pub const EMPTY_TITLE_ALERT_TITLE: &str = "Error";
pub const EMPTY_TITLE_ALERT_MESSAGE: &str = "Empty Task Cannot Be added";

/// Discrete user action delivered by the UI toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    InputChanged(String),
    SubmitInput,
    Delete(TaskId),
    EditOpen(TaskId),
    EditChanged(String),
    EditSave,
    EditCancel,
    Toggle(TaskId),
}

/// Blocking alert the UI must show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn empty_title() -> Self {
        Self {
            title: EMPTY_TITLE_ALERT_TITLE.to_string(),
            message: EMPTY_TITLE_ALERT_MESSAGE.to_string(),
        }
    }
}

/// Transient edit state; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub task_id: TaskId,
    pub draft: String,
}

/// One rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    pub status_label: &'static str,
    pub created_on: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            completed: task.completed,
            status_label: task.status_label(),
            created_on: format!("Created on: {}", task.created_on_label()),
        }
    }
}

/// Edit modal contents while a session is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModalView {
    pub title: &'static str,
    pub draft: String,
    pub draft_placeholder: &'static str,
    pub save_label: &'static str,
}

/// Everything the UI needs to draw the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub heading: &'static str,
    pub input_placeholder: &'static str,
    pub input_text: String,
    pub add_label: &'static str,
    pub rows: Vec<TaskRow>,
    pub edit_modal: Option<EditModalView>,
    /// Present only when the collection is empty.
    pub fallback: Option<&'static str>,
}

/// Controller owning the task store plus UI-only screen state.
pub struct TodoScreen<S: KeyValueStore> {
    store: TaskStore<S>,
    input: String,
    edit: Option<EditSession>,
}

impl<S: KeyValueStore> TodoScreen<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self {
            store,
            input: String::new(),
            edit: None,
        }
    }

    /// Applies one UI event; returns an alert when the UI must show one.
    pub fn dispatch(&mut self, event: ScreenEvent) -> Option<Notification> {
        match event {
            ScreenEvent::InputChanged(text) => self.input = text,
            ScreenEvent::SubmitInput => return self.submit_input(),
            ScreenEvent::Delete(id) => {
                self.store.remove(&id);
            }
            ScreenEvent::EditOpen(id) => self.open_edit(&id),
            ScreenEvent::EditChanged(text) => {
                if let Some(session) = self.edit.as_mut() {
                    session.draft = text;
                }
            }
            ScreenEvent::EditSave => self.save_edit(),
            ScreenEvent::EditCancel => self.edit = None,
            ScreenEvent::Toggle(id) => {
                self.store.toggle_completed(&id);
            }
        }
        None
    }

    pub fn view(&self) -> ScreenView {
        ScreenView {
            heading: SCREEN_HEADING,
            input_placeholder: INPUT_PLACEHOLDER,
            input_text: self.input.clone(),
            add_label: ADD_BUTTON_LABEL,
            rows: self.store.tasks().iter().map(TaskRow::from).collect(),
            edit_modal: self.edit.as_ref().map(|session| EditModalView {
                title: EDIT_MODAL_TITLE,
                draft: session.draft.clone(),
                draft_placeholder: EDIT_INPUT_PLACEHOLDER,
                save_label: EDIT_SAVE_LABEL,
            }),
            fallback: self.store.is_empty().then_some(EMPTY_LIST_FALLBACK),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    fn submit_input(&mut self) -> Option<Notification> {
        let title = std::mem::take(&mut self.input);
        match self.store.add(title) {
            Ok(_) => None,
            Err(_) => Some(Notification::empty_title()),
        }
    }

    fn open_edit(&mut self, id: &TaskId) {
        self.edit = self.store.get(id).map(|task| EditSession {
            task_id: task.id.clone(),
            draft: task.title.clone(),
        });
    }

    fn save_edit(&mut self) {
        if let Some(session) = self.edit.take() {
            self.store.update(&session.task_id, session.draft);
        }
    }
}
