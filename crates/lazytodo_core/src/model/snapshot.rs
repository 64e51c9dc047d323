//! Full-list snapshot codec.
//!
//! # Responsibility
//! - Serialize the whole task list to one JSON string.
//! - Parse a stored JSON string back into a task list.
//!
//! # Invariants
//! - Wire shape is a JSON array of `{id, text, completed}` objects, in list order.
//! - Decoded lists never contain duplicate ids.

use crate::model::task::{Task, TaskValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug)]
pub enum SnapshotError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    Invalid(TaskValidationError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode task snapshot: {err}"),
            Self::Decode(err) => write!(f, "failed to decode task snapshot: {err}"),
            Self::Invalid(err) => write!(f, "invalid task snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for SnapshotError {
    fn from(value: TaskValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Encodes the full task list.
pub fn encode_snapshot(tasks: &[Task]) -> SnapshotResult<String> {
    serde_json::to_string(tasks).map_err(SnapshotError::Encode)
}

/// Decodes a stored snapshot and checks the unique-id invariant.
pub fn decode_snapshot(raw: &str) -> SnapshotResult<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(raw).map_err(SnapshotError::Decode)?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(&task.id) {
            return Err(TaskValidationError::DuplicateId(task.id.clone()).into());
        }
    }

    Ok(tasks)
}
