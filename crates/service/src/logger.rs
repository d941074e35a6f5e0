//! Boundary between the host's execution events and the logging core.
//!
//! Nothing here returns an error to the host: a failure to log is traced and
//! swallowed so query execution is never disrupted.

use querylog_core::{ExecutionResult, StoreConfig};
use querylog_storage::Storage;

use crate::{BatchHandle, LogSession, SessionError, SessionRegistry};

/// Per-batch events delivered by the host, in order: one `on_start`, any
/// number of `on_message`/`on_error`, one `on_end`.
pub trait BatchEvents {
    fn on_start(
        &self,
        batch: &BatchHandle,
        server: &str,
        database: &str,
        connection_string: &str,
        query_text: &str,
    );

    fn on_message(&self, batch: &BatchHandle, message: &str, detailed_message: &str);

    fn on_error(
        &self,
        batch: &BatchHandle,
        detailed_message: &str,
        description_message: &str,
        line: i64,
    );

    fn on_end(&self, batch: &BatchHandle, result: ExecutionResult);

    /// The host is tearing the batch down.
    fn on_release(&self, batch: &BatchHandle);
}

/// Fail-soft [`BatchEvents`] implementation backed by a [`SessionRegistry`].
///
/// Construct once at process start and share it; when the store could not
/// be opened the logger is disabled and every event is a no-op.
#[derive(Debug)]
pub struct QueryLogger {
    registry: Option<SessionRegistry>,
}

impl QueryLogger {
    #[must_use]
    pub const fn new(registry: SessionRegistry) -> Self {
        Self { registry: Some(registry) }
    }

    /// Logger that records nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { registry: None }
    }

    /// Open the store described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, SessionError> {
        let storage = Storage::open_with(config)?;
        Ok(Self::new(SessionRegistry::new(storage)))
    }

    /// Open the store, or fall back to a disabled logger if it is unavailable.
    #[must_use]
    pub fn open_or_disabled(config: &StoreConfig) -> Self {
        match Self::open(config) {
            Ok(logger) => logger,
            Err(e) => {
                tracing::error!(
                    path = %config.db_path().display(),
                    error = %e,
                    "query log store unavailable, query logging disabled"
                );
                Self::disabled()
            },
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.registry.is_some()
    }

    #[must_use]
    pub const fn registry(&self) -> Option<&SessionRegistry> {
        self.registry.as_ref()
    }

    fn with_session<F>(&self, batch: &BatchHandle, event: &'static str, f: F)
    where
        F: FnOnce(&mut LogSession) -> Result<(), SessionError>,
    {
        let Some(registry) = &self.registry else {
            return;
        };
        let result = registry.session_for(batch).and_then(|session| {
            let mut session =
                session.lock().map_err(|_| SessionError::LockPoisoned("log session"))?;
            f(&mut *session)
        });
        if let Err(e) = result {
            report(batch, event, &e);
        }
    }
}

fn report(batch: &BatchHandle, event: &'static str, error: &SessionError) {
    if error.is_logic_error() {
        tracing::warn!(batch = %batch.id(), event, error = %error, "query log event out of order");
    } else {
        tracing::warn!(batch = %batch.id(), event, error = %error, "query log write failed");
    }
}

impl BatchEvents for QueryLogger {
    fn on_start(
        &self,
        batch: &BatchHandle,
        server: &str,
        database: &str,
        connection_string: &str,
        query_text: &str,
    ) {
        tracing::debug!(batch = %batch.id(), server, database, query = query_text.trim(), "START");
        self.with_session(batch, "start", |session| {
            session.start(server, database, connection_string, query_text).map(drop)
        });
    }

    fn on_message(&self, batch: &BatchHandle, message: &str, detailed_message: &str) {
        tracing::debug!(
            batch = %batch.id(),
            message = message.trim(),
            detail = detailed_message.trim(),
            "MSG"
        );
        self.with_session(batch, "message", |session| {
            session.record_message(message, detailed_message)
        });
    }

    fn on_error(
        &self,
        batch: &BatchHandle,
        detailed_message: &str,
        description_message: &str,
        line: i64,
    ) {
        tracing::debug!(
            batch = %batch.id(),
            detail = detailed_message.trim(),
            description = description_message.trim(),
            line,
            "ERR"
        );
        self.with_session(batch, "error", |session| {
            session.record_error(detailed_message, description_message, line)
        });
    }

    /// Records the result and lets go of the session: a batch object the
    /// host runs again starts a fresh session and a fresh query row.
    fn on_end(&self, batch: &BatchHandle, result: ExecutionResult) {
        tracing::debug!(batch = %batch.id(), %result, "END");
        self.with_session(batch, "end", |session| session.end(result).map(drop));
        self.on_release(batch);
    }

    fn on_release(&self, batch: &BatchHandle) {
        if let Some(registry) = &self.registry
            && let Err(e) = registry.release(batch)
        {
            report(batch, "release", &e);
        }
    }
}
