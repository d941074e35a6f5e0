#![expect(clippy::unwrap_used, reason = "test code")]

use super::{create_test_storage, insert_test_query};
use crate::storage::get_conn;
use crate::{Storage, StorageError, SCHEMA_VERSION};
use querylog_core::StoreConfig;
use tempfile::TempDir;

#[test]
fn test_open_applies_schema_and_wal() {
    let (storage, _temp_dir) = create_test_storage();

    assert_eq!(storage.schema_version().unwrap(), SCHEMA_VERSION);
    assert_eq!(storage.journal_mode().unwrap().to_lowercase(), "wal");

    let conn = get_conn(&storage.pool).unwrap();
    let foreign_keys: i64 =
        conn.pragma_query_value(None, "foreign_keys", |row| row.get(0)).unwrap();
    assert_eq!(foreign_keys, 1);

    let tables: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('query', 'message', 'errmessage') ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(tables, ["errmessage", "message", "query"]);
}

#[test]
fn test_reopen_is_idempotent_and_keeps_rows() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("reopen.sqlite");

    let first = Storage::open(&db_path).unwrap();
    let id = insert_test_query(&first, "SELECT 1");
    drop(first);

    let second = Storage::open(&db_path).unwrap();
    assert_eq!(second.schema_version().unwrap(), SCHEMA_VERSION);
    assert!(second.get_query(id).unwrap().is_some());
    assert_eq!(second.path(), db_path.as_path());
}

#[test]
fn test_open_creates_missing_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("dir").join("q.sqlite");

    let storage = Storage::open(&db_path).unwrap();
    insert_test_query(&storage, "SELECT 1");
    assert!(db_path.exists());
}

#[test]
fn test_strict_tables_reject_type_mismatch() {
    let (storage, _temp_dir) = create_test_storage();
    let conn = get_conn(&storage.pool).unwrap();

    let result = conn.execute(
        "INSERT INTO query (date, server, db, connection_string, query_text, status)
           VALUES ('2024-01-01T00:00:00+00:00', 's', 'd', 'c', 'q', 'not-a-number')",
        [],
    );
    let err: StorageError = result.unwrap_err().into();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
}

#[test]
fn test_not_null_columns_reject_missing_values() {
    let (storage, _temp_dir) = create_test_storage();
    let conn = get_conn(&storage.pool).unwrap();

    let result = conn.execute(
        "INSERT INTO query (date, server, db, connection_string) VALUES ('x', 's', 'd', 'c')",
        [],
    );
    let err: StorageError = result.unwrap_err().into();
    assert!(err.is_constraint_violation());
}

#[test]
fn test_open_fails_when_parent_is_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"plain file").unwrap();

    let err = Storage::open(&blocker.join("q.sqlite")).unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {err}");
}

#[test]
fn test_open_fails_on_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("corrupt.sqlite");
    std::fs::write(&db_path, "this is definitely not a sqlite database\n".repeat(200)).unwrap();

    let err = Storage::open(&db_path).unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {err}");
}

#[test]
fn test_open_with_zero_pool_is_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::new(temp_dir.path().join("q.sqlite")).with_pool_size(0);

    let err = Storage::open_with(&config).unwrap_err();
    assert!(err.is_unavailable());
}
