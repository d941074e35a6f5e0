#![expect(clippy::unwrap_used, reason = "test code")]

use std::collections::HashSet;
use std::sync::Barrier;
use std::thread;

use querylog_core::{timestamp_now, ExecutionResult, NewQuery, QueryId};
use querylog_storage::Storage;
use tempfile::tempdir;

const WINDOWS: usize = 4;
const QUERIES_PER_WINDOW: usize = 20;
const MESSAGES_PER_QUERY: usize = 3;

/// Each "window" opens its own store handle on the same file, like separate
/// editor processes would, and logs complete batches concurrently.
#[test]
fn test_independent_handles_write_concurrently_without_loss() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("shared.sqlite");
    // Create the schema up front so every window starts from the same state.
    drop(Storage::open(&db_path).unwrap());

    let ids: Vec<QueryId> = thread::scope(|scope| {
        let handles: Vec<_> = (0..WINDOWS)
            .map(|window| {
                let db_path = db_path.clone();
                scope.spawn(move || {
                    let storage = Storage::open(&db_path).unwrap();
                    let mut ids = Vec::with_capacity(QUERIES_PER_WINDOW);
                    for n in 0..QUERIES_PER_WINDOW {
                        let query = NewQuery::new(
                            timestamp_now(),
                            format!("srv-{window}"),
                            "db",
                            "cs",
                            format!("SELECT {n}"),
                        );
                        let id = storage.insert_query(&query).unwrap();
                        for m in 0..MESSAGES_PER_QUERY {
                            storage
                                .insert_message(id, &timestamp_now(), &format!("msg {m}"), "")
                                .unwrap();
                        }
                        storage.update_query_result(id, ExecutionResult::SUCCESS, 0.01).unwrap();
                        ids.push(id);
                    }
                    ids
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    let distinct: HashSet<QueryId> = ids.iter().copied().collect();
    assert_eq!(distinct.len(), WINDOWS * QUERIES_PER_WINDOW);

    let storage = Storage::open(&db_path).unwrap();
    let all = storage.recent_queries(1000).unwrap();
    assert_eq!(all.len(), WINDOWS * QUERIES_PER_WINDOW);
    assert!(all.iter().all(|q| q.status == Some(ExecutionResult::SUCCESS)));

    for id in ids {
        assert_eq!(storage.messages_for_query(id).unwrap().len(), MESSAGES_PER_QUERY);
    }
}

/// Every window opens a file that does not exist yet at the same moment:
/// exactly one runs the migration, the rest wait on the lock and find the
/// schema in place.
#[test]
fn test_simultaneous_first_open_of_new_file() {
    const OPENERS: usize = 8;

    for round in 0..10 {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join(format!("fresh-{round}.sqlite"));
        let barrier = Barrier::new(OPENERS);

        thread::scope(|scope| {
            for window in 0..OPENERS {
                let (db_path, barrier) = (&db_path, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    let storage = Storage::open(db_path).unwrap();
                    let query = NewQuery::new(
                        timestamp_now(),
                        format!("srv-{window}"),
                        "db",
                        "cs",
                        "SELECT 1",
                    );
                    storage.insert_query(&query).unwrap();
                });
            }
        });

        let storage = Storage::open(&db_path).unwrap();
        assert_eq!(storage.journal_mode().unwrap(), "wal");
        assert_eq!(storage.schema_version().unwrap(), querylog_storage::SCHEMA_VERSION);
        let servers: HashSet<String> =
            storage.recent_queries(100).unwrap().into_iter().map(|q| q.server).collect();
        assert_eq!(servers.len(), OPENERS);
    }
}

/// Clones of one handle share a pool; threads in one process log batches
/// side by side.
#[test]
fn test_shared_handle_across_threads() {
    let dir = tempdir().unwrap();
    let storage = Storage::open(&dir.path().join("threads.sqlite")).unwrap();

    thread::scope(|scope| {
        for t in 0..8 {
            let storage = storage.clone();
            scope.spawn(move || {
                for n in 0..10 {
                    let query =
                        NewQuery::new(timestamp_now(), "srv", "db", "cs", format!("-- {t}/{n}"));
                    let id = storage.insert_query(&query).unwrap();
                    storage
                        .insert_error_message(id, &timestamp_now(), "err", "desc", n)
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(storage.recent_queries(1000).unwrap().len(), 80);
}

/// WAL mode: an uncommitted write in another connection neither blocks
/// readers nor becomes visible to them.
#[test]
fn test_readers_not_blocked_by_open_write_transaction() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("wal.sqlite");
    let storage = Storage::open(&db_path).unwrap();
    let committed = storage
        .insert_query(&NewQuery::new(timestamp_now(), "srv", "db", "cs", "SELECT 1"))
        .unwrap();

    let writer = rusqlite::Connection::open(&db_path).unwrap();
    writer.execute_batch("BEGIN IMMEDIATE").unwrap();
    writer
        .execute(
            "INSERT INTO query (date, server, db, connection_string, query_text)
               VALUES ('2024-01-01T00:00:00+00:00', 'srv', 'db', 'cs', 'SELECT 2')",
            [],
        )
        .unwrap();

    let visible = storage.recent_queries(10).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, committed);

    writer.execute_batch("COMMIT").unwrap();
    assert_eq!(storage.recent_queries(10).unwrap().len(), 2);
}
