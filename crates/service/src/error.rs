//! Typed error enum for the service layer.

use querylog_storage::StorageError;
use thiserror::Error;

/// Failure of a logging session or the registry.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Store operation failed (unavailable, constraint, database).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Event arrived out of order for the session's state.
    #[error("logic error: {0}")]
    Logic(String),

    /// A thread panicked while holding the named lock.
    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}

impl SessionError {
    /// Integration defect rather than an environmental failure.
    #[must_use]
    pub const fn is_logic_error(&self) -> bool {
        match self {
            Self::Logic(_) => true,
            Self::Storage(e) => e.is_logic_error(),
            Self::LockPoisoned(_) => false,
        }
    }

    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_constraint_violation())
    }

    #[must_use]
    pub const fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_unavailable())
    }
}
