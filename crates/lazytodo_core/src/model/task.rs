//! Task domain model.
//!
//! # Responsibility
//! - Define the three-field task record (`id`, `text`, `completed`).
//! - Enforce creation-time validation of task text.
//!
//! # Invariants
//! - `id` is non-empty and never changes after creation.
//! - Newly created tasks carry trimmed, non-empty text and `completed = false`.
//! - Text replaced by an edit is stored verbatim (no creation-time checks).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one task.
///
/// Serialized as a plain JSON string. Deserialization rejects empty values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an externally provided identifier.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::EmptyId` when `value` is blank.
    pub fn parse(value: impl Into<String>) -> Result<Self, TaskValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

/// Validation errors for task records and task lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task text is empty after trimming.
    EmptyText,
    /// Task id is empty after trimming.
    EmptyId,
    /// Two tasks in one list share an id.
    DuplicateId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "Task description cannot be empty"),
            Self::EmptyId => write!(f, "task id cannot be empty"),
            Self::DuplicateId(id) => write!(f, "duplicate task id: {id}"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical to-do record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Creates an incomplete task with a generated id.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::EmptyText` when `text` is blank.
    pub fn new(text: &str) -> Result<Self, TaskValidationError> {
        Self::with_id(TaskId::generate(), text)
    }

    /// Creates an incomplete task with a caller-provided id.
    ///
    /// Text is trimmed before it is stored.
    pub fn with_id(id: TaskId, text: &str) -> Result<Self, TaskValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(Self {
            id,
            text: text.to_string(),
            completed: false,
        })
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Label of the action that flips this task's completion flag.
    pub fn toggle_label(&self) -> &'static str {
        if self.completed {
            "Undo"
        } else {
            "Complete"
        }
    }
}
