//! Typed error enum for the storage layer.
//!
//! Callers match on the failure mode (store unavailable, rejected insert,
//! misuse of an id) instead of inspecting `SQLite` result codes.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store file could not be opened, created or migrated.
    #[error("query log store unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A required field was missing or a foreign key did not resolve.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Caller used the store out of contract, e.g. finishing a query id that
    /// was never inserted.
    #[error("logic error: {0}")]
    Logic(String),

    /// SQL / connection / lock failure.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// No pooled connection became available.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl StorageError {
    pub(crate) fn unavailable(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Unavailable { path: path.into(), source: source.into() }
    }

    /// Whether this error is likely transient (another writer held the lock
    /// past the busy timeout).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(rusqlite::Error::SqliteFailure(e, _)) => {
                matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            },
            Self::Pool(_) => true,
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }

    #[must_use]
    pub const fn is_logic_error(&self) -> bool {
        matches!(self, Self::Logic(_))
    }

    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Custom `From<rusqlite::Error>`, not a blanket `#[from]`.
///
/// - `SQLITE_CONSTRAINT*` (NOT NULL, FOREIGN KEY, STRICT type check) → `ConstraintViolation`
/// - Everything else → `Database`
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
                Self::ConstraintViolation(msg.clone().unwrap_or_else(|| e.to_string()))
            },
            _ => Self::Database(err),
        }
    }
}
