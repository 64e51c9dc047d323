use lazytodo_core::db::migrations::latest_version;
use lazytodo_core::db::open_db_in_memory;
use lazytodo_core::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError};
use rusqlite::Connection;

#[test]
fn sqlite_get_returns_none_for_unwritten_key() {
    let store = SqliteKeyValueStore::try_new(open_db_in_memory().unwrap()).unwrap();
    assert_eq!(store.get("tasks").unwrap(), None);
}

#[test]
fn sqlite_set_overwrites_previous_value() {
    let store = SqliteKeyValueStore::try_new(open_db_in_memory().unwrap()).unwrap();

    store.set("tasks", "[1]").unwrap();
    store.set("tasks", "[1,2]").unwrap();

    assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1,2]"));
    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    let store = SqliteKeyValueStore::open(&path).unwrap();
    store.set("tasks", r#"[{"id":"a","text":"x","completed":false}]"#).unwrap();
    drop(store);

    let reopened = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(
        reopened.get("tasks").unwrap().as_deref(),
        Some(r#"[{"id":"a","text":"x","completed":false}]"#)
    );
}

#[test]
fn sqlite_store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKeyValueStore::try_new(conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn sqlite_store_rejects_connection_without_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKeyValueStore::try_new(conn),
        Err(StoreError::MissingRequiredTable("kv_entries"))
    ));
}

#[test]
fn memory_store_injected_failures_and_recovery() {
    let store = MemoryKeyValueStore::with_entry("tasks", "[]");

    store.set_fail_reads(true);
    assert!(matches!(store.get("tasks"), Err(StoreError::Unavailable(_))));
    store.set_fail_reads(false);
    assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));

    store.set_fail_writes(true);
    assert!(store.set("tasks", "[1]").is_err());
    assert_eq!(store.write_count(), 0);
    assert_eq!(store.peek("tasks").as_deref(), Some("[]"));

    store.set_fail_writes(false);
    store.set("tasks", "[1]").unwrap();
    assert_eq!(store.write_count(), 1);
}

#[test]
fn borrowed_store_is_a_store() {
    let store = MemoryKeyValueStore::new();
    let borrowed: &MemoryKeyValueStore = &store;
    <&MemoryKeyValueStore as KeyValueStore>::set(&borrowed, "k", "v").unwrap();
    assert_eq!(store.peek("k").as_deref(), Some("v"));
}
