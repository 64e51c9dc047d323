//! Delete confirmation and edit draft contracts shared with the UI.
//!
//! The task list does not enforce confirmation itself; callers route the
//! user's answer through `TaskListManager::resolve_delete`.

use crate::model::task::TaskId;

/// Answer to the delete confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteChoice {
    Cancel,
    Delete,
}

impl DeleteChoice {
    /// Maps a yes/no confirmation flag to a choice.
    pub fn from_confirmed(confirmed: bool) -> Self {
        if confirmed {
            Self::Delete
        } else {
            Self::Cancel
        }
    }
}

/// Content of the two-choice delete dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub title: &'static str,
    pub message: &'static str,
    /// Non-destructive choice, maps to `DeleteChoice::Cancel`.
    pub cancel_label: &'static str,
    /// Destructive choice, maps to `DeleteChoice::Delete`.
    pub confirm_label: &'static str,
}

impl DeletePrompt {
    pub fn standard() -> Self {
        Self {
            title: "Confirm Delete",
            message: "Are you sure you want to delete this task?",
            cancel_label: "Cancel",
            confirm_label: "Delete",
        }
    }
}

/// Pending edit of one task's text.
///
/// Opened from an existing task; dropping it discards the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: TaskId,
    pub text: String,
}
