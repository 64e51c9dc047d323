//! Task list state manager.
//!
//! # Responsibility
//! - Own the canonical in-memory task list for one app session.
//! - Apply create/edit/toggle/delete mutations in call order.
//! - Write the full list snapshot to the key-value store after every mutation.
//!
//! # Invariants
//! - The list is only mutated through this type; callers get read-only slices.
//! - Task ids stay unique; order is insertion order.
//! - Storage failures never roll back in-memory state and never surface as
//!   `Err`; only validation does.
//! - Logs carry ids and counts, never task text.

use crate::model::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::service::confirm::{DeleteChoice, EditDraft};
use crate::store::{KeyValueStore, StoreError};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store key holding the task list snapshot.
pub const TASKS_STORAGE_KEY: &str = "tasks";

pub type TaskListResult<T> = Result<T, TaskListError>;

/// User-visible task list error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListError {
    Validation(TaskValidationError),
}

impl Display for TaskListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskListError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Snapshot read/write failure, reported but never propagated.
#[derive(Debug)]
pub enum PersistError {
    Store(StoreError),
    Snapshot(SnapshotError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<StoreError> for PersistError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SnapshotError> for PersistError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

/// Result of reading the stored snapshot.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Snapshot parsed and installed as the in-memory list.
    Restored { count: usize },
    /// No snapshot stored yet; list left as it was.
    NoSnapshot,
    /// Read or parse failed; list left as it was.
    Failed(PersistError),
}

impl LoadOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Whether the stored snapshot matches the in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    Synced,
    /// Last read or write failed; in-memory list is still authoritative.
    Stale,
}

/// Owned task list with snapshot persistence.
pub struct TaskListManager<S: KeyValueStore> {
    store: S,
    tasks: Vec<Task>,
    snapshot_state: SnapshotState,
}

impl<S: KeyValueStore> TaskListManager<S> {
    /// Creates an empty manager over `store`. Call `load` to restore data.
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            snapshot_state: SnapshotState::Synced,
        }
    }

    /// Replaces the in-memory list with the stored snapshot, if any.
    ///
    /// A blank stored value counts as no snapshot.
    ///
    /// Failures are logged and returned as `LoadOutcome::Failed`; the list is
    /// left untouched so the app stays usable.
    pub fn load(&mut self) -> LoadOutcome {
        match self.read_snapshot() {
            Ok(Some(tasks)) => {
                let count = tasks.len();
                self.tasks = tasks;
                self.snapshot_state = SnapshotState::Synced;
                info!("event=tasks_load module=task_list status=ok restored={count}");
                LoadOutcome::Restored { count }
            }
            Ok(None) => {
                // Tasks whose writes failed are still unsaved.
                if self.tasks.is_empty() {
                    self.snapshot_state = SnapshotState::Synced;
                }
                info!("event=tasks_load module=task_list status=ok restored=0 snapshot=absent");
                LoadOutcome::NoSnapshot
            }
            Err(err) => {
                self.snapshot_state = SnapshotState::Stale;
                error!(
                    "event=tasks_load module=task_list status=error error_code=load_failed error={err}"
                );
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Appends a new incomplete task with trimmed `text`.
    ///
    /// # Errors
    /// - `TaskListError::Validation(EmptyText)` when `text` is blank; nothing is
    ///   mutated or written.
    pub fn add_task(&mut self, text: &str) -> TaskListResult<&[Task]> {
        let task = match Task::with_id(self.fresh_id(), text) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_add module=task_list status=rejected reason=empty_text");
                return Err(err.into());
            }
        };

        debug!(
            "event=task_add module=task_list status=ok task_id={}",
            task.id
        );
        self.tasks.push(task);
        self.save();
        Ok(&self.tasks)
    }

    /// Replaces the text of task `id`. Missing ids are a silent no-op.
    ///
    /// The new text is stored as given.
    pub fn edit_task(&mut self, id: &str, new_text: &str) -> &[Task] {
        let found = match self.find_mut(id) {
            Some(task) => {
                task.text = new_text.to_string();
                true
            }
            None => false,
        };
        debug!("event=task_edit module=task_list status=ok task_id={id} found={found}");
        self.save();
        &self.tasks
    }

    /// Flips `completed` on task `id`. Missing ids are a silent no-op.
    pub fn toggle_complete(&mut self, id: &str) -> &[Task] {
        let found = match self.find_mut(id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        };
        debug!("event=task_toggle module=task_list status=ok task_id={id} found={found}");
        self.save();
        &self.tasks
    }

    /// Removes task `id`. Missing ids are a silent no-op.
    ///
    /// Callers are expected to confirm with the user first; see
    /// `resolve_delete`.
    pub fn delete_task(&mut self, id: &str) -> &[Task] {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id.as_str() != id);
        let found = self.tasks.len() != before;
        debug!("event=task_delete module=task_list status=ok task_id={id} found={found}");
        self.save();
        &self.tasks
    }

    /// Applies the user's answer to the delete confirmation prompt.
    ///
    /// `Cancel` leaves both the list and the store untouched.
    pub fn resolve_delete(&mut self, id: &str, choice: DeleteChoice) -> &[Task] {
        match choice {
            DeleteChoice::Delete => self.delete_task(id),
            DeleteChoice::Cancel => {
                debug!("event=task_delete module=task_list status=cancelled task_id={id}");
                &self.tasks
            }
        }
    }

    /// Opens an edit draft pre-filled with the task's current text.
    pub fn begin_edit(&self, id: &str) -> Option<EditDraft> {
        self.get(id).map(|task| EditDraft {
            id: task.id.clone(),
            text: task.text.clone(),
        })
    }

    /// Commits an edit draft through `edit_task`.
    pub fn commit_edit(&mut self, draft: EditDraft) -> &[Task] {
        self.edit_task(draft.id.as_str(), &draft.text)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id.as_str() == id)
    }

    pub fn snapshot_state(&self) -> SnapshotState {
        self.snapshot_state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id.as_str() == id)
    }

    fn fresh_id(&self) -> TaskId {
        loop {
            let id = TaskId::generate();
            if self.get(id.as_str()).is_none() {
                return id;
            }
        }
    }

    fn read_snapshot(&self) -> Result<Option<Vec<Task>>, PersistError> {
        match self.store.get(TASKS_STORAGE_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(decode_snapshot(&raw)?)),
            _ => Ok(None),
        }
    }

    fn write_snapshot(&self) -> Result<(), PersistError> {
        let raw = encode_snapshot(&self.tasks)?;
        self.store.set(TASKS_STORAGE_KEY, &raw)?;
        Ok(())
    }

    // Full snapshot, last write wins. No rollback, no retry.
    fn save(&mut self) {
        match self.write_snapshot() {
            Ok(()) => {
                self.snapshot_state = SnapshotState::Synced;
                debug!(
                    "event=tasks_save module=task_list status=ok count={}",
                    self.tasks.len()
                );
            }
            Err(err) => {
                self.snapshot_state = SnapshotState::Stale;
                error!(
                    "event=tasks_save module=task_list status=error count={} error_code=save_failed error={err}",
                    self.tasks.len()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SnapshotState, TaskListManager, TASKS_STORAGE_KEY};
    use crate::store::memory_store::MemoryKeyValueStore;

    #[test]
    fn fresh_manager_is_empty_and_synced() {
        let manager = TaskListManager::new(MemoryKeyValueStore::new());
        assert!(manager.is_empty());
        assert_eq!(manager.snapshot_state(), SnapshotState::Synced);
    }

    #[test]
    fn rejected_add_does_not_write() {
        let mut manager = TaskListManager::new(MemoryKeyValueStore::new());
        assert!(manager.add_task("  ").is_err());
        assert_eq!(manager.store().write_count(), 0);
        assert!(manager.store().peek(TASKS_STORAGE_KEY).is_none());
    }

    #[test]
    fn every_mutation_writes_full_snapshot() {
        let mut manager = TaskListManager::new(MemoryKeyValueStore::new());
        let id = manager.add_task("a").unwrap()[0].id.clone();
        manager.add_task("b").unwrap();
        manager.toggle_complete(id.as_str());

        assert_eq!(manager.store().write_count(), 3);
        let stored = manager.store().peek(TASKS_STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["completed"], true);
        assert_eq!(value[1]["text"], "b");
    }
}
