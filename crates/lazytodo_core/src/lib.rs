//! Core domain logic for LazyTodo.
//! This crate owns the task list and its on-device persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::snapshot::{decode_snapshot, encode_snapshot, SnapshotError, SnapshotResult};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use service::confirm::{DeleteChoice, DeletePrompt, EditDraft};
pub use service::task_list::{
    LoadOutcome, PersistError, SnapshotState, TaskListError, TaskListManager, TaskListResult,
    TASKS_STORAGE_KEY,
};
pub use store::memory_store::MemoryKeyValueStore;
pub use store::sqlite_store::SqliteKeyValueStore;
pub use store::{KeyValueStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
