//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list operations to Dart via FRB.
//! - Own the single process-wide task list instance.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every task call returns the full current list for re-render.
//! - Only validation failures set `ok = false` after the list is open;
//!   storage failures surface as `synced = false`.

use lazytodo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DeleteChoice, DeletePrompt, LoadOutcome, SnapshotState, SqliteKeyValueStore, Task,
    TaskListManager,
};
use log::{info, warn};
use std::sync::{Mutex, MutexGuard};

type SessionTaskList = TaskListManager<SqliteKeyValueStore>;

static TASK_LIST: Mutex<Option<SessionTaskList>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
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
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One task row for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// `Complete` or `Undo`.
    pub toggle_label: String,
}

impl From<&Task> for TaskItem {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            text: task.text.clone(),
            completed: task.completed,
            toggle_label: task.toggle_label().to_string(),
        }
    }
}

/// Response envelope for task list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// False on validation failure or when no list is open.
    pub ok: bool,
    /// Full current list, in display order.
    pub tasks: Vec<TaskItem>,
    /// Human-readable message; user-facing on validation failure.
    pub message: String,
    /// Whether the stored snapshot matches `tasks`.
    pub synced: bool,
}

impl TaskListResponse {
    fn from_list(list: &SessionTaskList, ok: bool, message: impl Into<String>) -> Self {
        Self {
            ok,
            tasks: list.tasks().iter().map(TaskItem::from).collect(),
            message: message.into(),
            synced: list.snapshot_state() == SnapshotState::Synced,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            tasks: Vec::new(),
            message: message.into(),
            synced: false,
        }
    }
}

/// Delete confirmation dialog content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePromptView {
    pub title: String,
    pub message: String,
    pub cancel_label: String,
    pub confirm_label: String,
}

/// Opens the on-device task database and loads the saved list.
///
/// Replaces any previously opened list. If the database cannot be opened, the
/// previous list is closed as well and later task calls report "not open".
/// A snapshot that cannot be read is not fatal: the list starts empty and
/// `synced` is false.
pub fn tasks_open(db_path: String) -> TaskListResponse {
    let db_path = db_path.trim();
    if db_path.is_empty() {
        return TaskListResponse::failure("tasks_open failed: db_path cannot be empty");
    }

    let store = match SqliteKeyValueStore::open(db_path) {
        Ok(store) => store,
        Err(err) => {
            // The host asked for a different database; stop serving the old one.
            if lock_task_list().take().is_some() {
                warn!("event=tasks_open module=ffi status=error closed_previous=true");
            }
            return TaskListResponse::failure(format!("tasks_open failed: {err}"));
        }
    };

    let mut list = TaskListManager::new(store);
    let message = load_message(&list.load());
    let response = TaskListResponse::from_list(&list, true, message);

    let mut slot = lock_task_list();
    if slot.replace(list).is_some() {
        info!("event=tasks_open module=ffi status=ok replaced=true");
    }
    response
}

/// Reloads the list from the store, replacing in-memory state on success.
pub fn tasks_load() -> TaskListResponse {
    with_task_list(|list| Ok(load_message(&list.load())))
}

/// Returns the current list without touching storage.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list() -> TaskListResponse {
    with_task_list(|list| Ok(format!("{} task(s).", list.len())))
}

/// Adds a task. Blank text returns `ok = false` with a user-facing message.
pub fn tasks_add(text: String) -> TaskListResponse {
    with_task_list(|list| {
        list.add_task(&text)
            .map(|_| "Task added.".to_string())
            .map_err(|err| err.to_string())
    })
}

/// Replaces a task's text. Unknown ids leave the list unchanged.
pub fn tasks_edit(id: String, text: String) -> TaskListResponse {
    with_task_list(|list| {
        list.edit_task(&id, &text);
        Ok("Task updated.".to_string())
    })
}

/// Flips a task between complete and incomplete.
pub fn tasks_toggle(id: String) -> TaskListResponse {
    with_task_list(|list| {
        list.toggle_complete(&id);
        Ok("Task updated.".to_string())
    })
}

/// Dialog content the UI must show before calling `tasks_delete`.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_delete_prompt() -> DeletePromptView {
    let prompt = DeletePrompt::standard();
    DeletePromptView {
        title: prompt.title.to_string(),
        message: prompt.message.to_string(),
        cancel_label: prompt.cancel_label.to_string(),
        confirm_label: prompt.confirm_label.to_string(),
    }
}

/// Applies the answer to the delete prompt; `confirmed = false` is a cancel.
pub fn tasks_delete(id: String, confirmed: bool) -> TaskListResponse {
    with_task_list(|list| {
        list.resolve_delete(&id, DeleteChoice::from_confirmed(confirmed));
        Ok(if confirmed {
            "Task deleted.".to_string()
        } else {
            "Delete cancelled.".to_string()
        })
    })
}

fn load_message(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Restored { count } => format!("Loaded {count} task(s)."),
        LoadOutcome::NoSnapshot => "No saved tasks.".to_string(),
        LoadOutcome::Failed(err) => format!("Saved tasks could not be loaded: {err}"),
    }
}

fn lock_task_list() -> MutexGuard<'static, Option<SessionTaskList>> {
    // List state stays consistent across a panicked holder; keep serving it.
    TASK_LIST
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_task_list(
    f: impl FnOnce(&mut SessionTaskList) -> Result<String, String>,
) -> TaskListResponse {
    let mut slot = lock_task_list();
    let Some(list) = slot.as_mut() else {
        warn!("event=task_call module=ffi status=error error_code=not_open");
        return TaskListResponse::failure("task list is not open; call tasks_open first");
    };

    match f(list) {
        Ok(message) => TaskListResponse::from_list(list, true, message),
        Err(message) => TaskListResponse::from_list(list, false, message),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, tasks_add, tasks_delete, tasks_delete_prompt,
        tasks_edit, tasks_list, tasks_load, tasks_open, tasks_toggle,
    };
    use lazytodo_core::{KeyValueStore, SqliteKeyValueStore, TASKS_STORAGE_KEY};
    use std::sync::Mutex;

    // The task list is process-global; serialize tests that open it.
    static SESSION: Mutex<()> = Mutex::new(());

    fn open_fresh(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("tasks.db");
        let path = path.to_str().expect("utf-8 temp path").to_string();
        let response = tasks_open(path.clone());
        assert!(response.ok, "{}", response.message);
        path
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
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn tasks_open_rejects_blank_path() {
        let response = tasks_open("   ".to_string());
        assert!(!response.ok);
        assert!(response.tasks.is_empty());
    }

    #[test]
    fn delete_prompt_has_cancel_and_delete() {
        let prompt = tasks_delete_prompt();
        assert_eq!(prompt.cancel_label, "Cancel");
        assert_eq!(prompt.confirm_label, "Delete");
    }

    #[test]
    fn task_flow_persists_across_reopen() {
        let _guard = SESSION.lock().unwrap_or_else(|p| p.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = open_fresh(&dir);

        let added = tasks_add("  Buy milk ".to_string());
        assert!(added.ok);
        assert!(added.synced);
        assert_eq!(added.tasks.len(), 1);
        assert_eq!(added.tasks[0].text, "Buy milk");
        assert_eq!(added.tasks[0].toggle_label, "Complete");
        let id = added.tasks[0].id.clone();

        let toggled = tasks_toggle(id.clone());
        assert!(toggled.tasks[0].completed);
        assert_eq!(toggled.tasks[0].toggle_label, "Undo");

        let edited = tasks_edit(id.clone(), "Buy oat milk".to_string());
        assert_eq!(edited.tasks[0].text, "Buy oat milk");
        assert!(edited.tasks[0].completed);

        let reopened = tasks_open(path);
        assert!(reopened.ok);
        assert_eq!(reopened.tasks, edited.tasks);
        assert_eq!(tasks_load().tasks, edited.tasks);

        let cancelled = tasks_delete(id.clone(), false);
        assert_eq!(cancelled.tasks.len(), 1);

        let deleted = tasks_delete(id, true);
        assert!(deleted.ok);
        assert!(deleted.tasks.is_empty());
    }

    #[test]
    fn failed_open_closes_previous_list() {
        let _guard = SESSION.lock().unwrap_or_else(|p| p.into_inner());
        let dir = tempfile::tempdir().unwrap();
        open_fresh(&dir);
        assert!(tasks_add("old".to_string()).ok);

        // A directory is not an openable database file.
        let bad_path = dir.path().to_str().expect("utf-8 temp path").to_string();
        let response = tasks_open(bad_path);
        assert!(!response.ok);
        assert!(response.tasks.is_empty());

        let listed = tasks_list();
        assert!(!listed.ok);
        assert!(listed.tasks.is_empty());
        assert!(listed.message.contains("not open"));
    }

    #[test]
    fn corrupt_snapshot_opens_usable_but_unsynced() {
        let _guard = SESSION.lock().unwrap_or_else(|p| p.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        let store = SqliteKeyValueStore::open(&path).unwrap();
        store.set(TASKS_STORAGE_KEY, "{not json").unwrap();
        drop(store);

        let opened = tasks_open(path.to_str().expect("utf-8 temp path").to_string());
        assert!(opened.ok);
        assert!(!opened.synced);
        assert!(opened.tasks.is_empty());
        assert!(opened.message.contains("could not be loaded"));

        let added = tasks_add("fresh start".to_string());
        assert!(added.ok);
        assert!(added.synced);
        assert_eq!(added.tasks.len(), 1);
    }

    #[test]
    fn blank_task_is_rejected_with_user_message() {
        let _guard = SESSION.lock().unwrap_or_else(|p| p.into_inner());
        let dir = tempfile::tempdir().unwrap();
        open_fresh(&dir);
        tasks_add("keep".to_string());

        let response = tasks_add("   ".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, "Task description cannot be empty");
        assert_eq!(response.tasks.len(), 1);
        assert_eq!(tasks_list().tasks.len(), 1);
    }
}
