//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted entity and its wire shape.
//! - Provide creation-time validation and display helpers.
//!
//! # Invariants
//! - `id` is non-empty and never changes after creation.
//! - `title` is non-blank at creation; renames are not validated.
//! - `created_at` has millisecond precision and never changes.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a task.
///
/// Stored as an opaque string so snapshots written with older id schemes
/// (millisecond timestamps) keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh collision-resistant id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id, rejecting empty values.
    pub fn parse(value: impl Into<String>) -> Result<Self, TaskValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Validation error for task construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Identifier is empty.
    EmptyId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyId => write!(f, "task id cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A single to-do item.
///
/// Field names match the persisted JSON layout
/// (`id`, `title`, `completed`, `created_at`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// Serialized as ISO-8601 with millisecond fraction, e.g.
    /// `2024-05-01T12:34:56.789Z`.
    #[serde(with = "iso8601_millis")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new open task stamped with the current time.
    ///
    /// # Errors
    /// - `EmptyTitle` when `title` is empty or all whitespace.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(Self {
            id: TaskId::generate(),
            title,
            completed: false,
            created_at: Utc::now().trunc_subsecs(3),
        })
    }

    /// Creates a task with caller-provided identity and state.
    ///
    /// Used by import and test paths. The title is not validated, matching
    /// what an edited task may legitimately hold.
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        Ok(Self {
            id: TaskId::parse(id)?,
            title: title.into(),
            completed,
            created_at: created_at.trunc_subsecs(3),
        })
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Replaces the title without validation.
    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Status badge text shown next to the title.
    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Done"
        } else {
            "In Progress"
        }
    }

    /// Creation date formatted as `M/D/YYYY`.
    pub fn created_on_label(&self) -> String {
        self.created_at.format("%-m/%-d/%Y").to_string()
    }
}

mod iso8601_millis {
    use super::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc).trunc_subsecs(3))
            .map_err(|err| serde::de::Error::custom(format!("invalid created_at `{raw}`: {err}")))
    }
}
