//! `SQLite` storage implementation
//!
//! All methods are synchronous; each one checks a connection out of the pool
//! for the duration of a single statement.

mod messages;
mod queries;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use querylog_core::StoreConfig;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use rusqlite::types::Type;

use crate::StorageError;
use crate::migrations;

/// Type alias for pooled connection
pub(crate) type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Handle to the shared query log database.
///
/// Cheap to clone; clones share one connection pool. Independent handles
/// (other processes, other windows) may open the same file concurrently.
#[derive(Clone, Debug)]
pub struct Storage {
    pub(crate) pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

/// Get a connection from the pool
pub(crate) fn get_conn(pool: &Pool<SqliteConnectionManager>) -> Result<PooledConn, StorageError> {
    Ok(pool.get()?)
}

/// Log row read errors and filter them out
pub(crate) fn log_row_error<T>(result: rusqlite::Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("Row read error: {}", e);
            None
        },
    }
}

/// Parse an RFC 3339 column, converting the error to a rusqlite error
pub(crate) fn parse_timestamp(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<DateTime<FixedOffset>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Per-connection settings: WAL for cross-process writers, enforced foreign
/// keys, and a busy timeout so a writer waits out another window's commit.
fn init_connection(conn: &mut Connection, busy_timeout: Duration) -> Result<(), rusqlite::Error> {
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;",
    )?;
    Ok(())
}

impl Storage {
    /// Open or create the store at `db_path` with default pool settings.
    ///
    /// # Errors
    /// Returns [`StorageError::Unavailable`] if the file cannot be created,
    /// is not a database, or the schema cannot be applied.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        Self::open_with(&StoreConfig::new(db_path))
    }

    /// Open or create the store described by `config`.
    ///
    /// # Errors
    /// See [`Storage::open`].
    pub fn open_with(config: &StoreConfig) -> Result<Self, StorageError> {
        let path = config.db_path().to_path_buf();
        let busy_timeout = config.busy_timeout();
        config.validate().map_err(|e| StorageError::unavailable(&path, e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::unavailable(&path, e))?;
        }

        // Probe with a direct connection so a corrupt or unwritable file fails
        // here instead of inside the pool's retry loop.
        let mut probe = Connection::open(&path).map_err(|e| StorageError::unavailable(&path, e))?;
        init_connection(&mut probe, busy_timeout).map_err(|e| StorageError::unavailable(&path, e))?;
        migrations::run_migrations(&probe).map_err(|e| StorageError::unavailable(&path, e))?;
        drop(probe);

        let manager = SqliteConnectionManager::file(&path)
            .with_init(move |conn| init_connection(conn, busy_timeout));
        let pool = Pool::builder()
            .max_size(config.pool_size)
            .min_idle(Some(0))
            .connection_timeout(busy_timeout.max(Duration::from_secs(1)))
            .build(manager)
            .map_err(|e| StorageError::unavailable(&path, e))?;

        tracing::info!(
            path = %path.display(),
            pool_size = config.pool_size,
            busy_timeout_ms = config.busy_timeout_ms,
            "Query log store opened"
        );

        Ok(Self { pool, path })
    }

    /// Location of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schema version recorded in the file.
    ///
    /// # Errors
    /// Returns error if the pragma cannot be read.
    pub fn schema_version(&self) -> Result<i32, StorageError> {
        let conn = get_conn(&self.pool)?;
        Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    /// Journal mode in effect for pooled connections (`"wal"` when healthy).
    ///
    /// # Errors
    /// Returns error if the pragma cannot be read.
    pub fn journal_mode(&self) -> Result<String, StorageError> {
        let conn = get_conn(&self.pool)?;
        Ok(conn.pragma_query_value(None, "journal_mode", |row| row.get(0))?)
    }
}
