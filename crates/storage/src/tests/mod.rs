//! Test utilities and module declarations for storage tests.

use crate::Storage;
use querylog_core::{timestamp_now, NewQuery, QueryId};
use tempfile::TempDir;

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.sqlite");
    let storage = Storage::open(&db_path).unwrap();
    (storage, temp_dir)
}

pub fn create_test_query(query_text: &str) -> NewQuery {
    NewQuery::new(
        timestamp_now(),
        "srv",
        "db",
        "Data Source=srv;Initial Catalog=db",
        query_text,
    )
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn insert_test_query(storage: &Storage, query_text: &str) -> QueryId {
    storage.insert_query(&create_test_query(query_text)).unwrap()
}

mod schema_tests;
