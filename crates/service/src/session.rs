use std::time::Instant;

use querylog_core::{timestamp_now, ExecutionResult, NewQuery, QueryId};
use querylog_storage::Storage;

use crate::SessionError;

/// Lifecycle of a [`LogSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, nothing written yet.
    Created,
    /// `start` recorded; messages and errors attach to the query row.
    Running,
    /// `end` recorded; the query row is final.
    Completed,
}

impl SessionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

/// Logging state of one execution batch, from `start` to `end`.
///
/// Owns the batch's `query` row: inserts it on [`start`](Self::start),
/// attaches messages and errors to it, and stamps the final status and
/// elapsed time on [`end`](Self::end). Events for one batch arrive in order
/// on one logical timeline; the session does not reorder or buffer.
#[derive(Debug)]
pub struct LogSession {
    storage: Storage,
    state: SessionState,
    query_id: Option<QueryId>,
    started: Option<Instant>,
}

impl LogSession {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage, state: SessionState::Created, query_id: None, started: None }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Id of the query row, once `start` has succeeded.
    #[must_use]
    pub const fn query_id(&self) -> Option<QueryId> {
        self.query_id
    }

    /// Begin timing and insert the batch's query row.
    ///
    /// On a failed insert the session stays `Created`.
    pub fn start(
        &mut self,
        server: &str,
        database: &str,
        connection_string: &str,
        query_text: &str,
    ) -> Result<QueryId, SessionError> {
        if self.state != SessionState::Created {
            return Err(self.out_of_order("start"));
        }

        let started = Instant::now();
        let query =
            NewQuery::new(timestamp_now(), server, database, connection_string, query_text);
        let id = self.storage.insert_query(&query)?;

        self.started = Some(started);
        self.query_id = Some(id);
        self.state = SessionState::Running;
        Ok(id)
    }

    /// Attach an informational message, trimmed, to the running query.
    pub fn record_message(&self, message: &str, detailed_message: &str) -> Result<(), SessionError> {
        let id = self.running_query("record_message")?;
        self.storage.insert_message(id, &timestamp_now(), message.trim(), detailed_message.trim())?;
        Ok(())
    }

    /// Attach an engine error, trimmed, to the running query.
    pub fn record_error(
        &self,
        detailed_message: &str,
        description_message: &str,
        line: i64,
    ) -> Result<(), SessionError> {
        let id = self.running_query("record_error")?;
        self.storage.insert_error_message(
            id,
            &timestamp_now(),
            detailed_message.trim(),
            description_message.trim(),
            line,
        )?;
        Ok(())
    }

    /// Stop the timer and write the resolved status and duration.
    ///
    /// Returns the status that was recorded.
    pub fn end(&mut self, result: ExecutionResult) -> Result<ExecutionResult, SessionError> {
        let id = self.running_query("end")?;
        let elapsed = self.started.map_or(0.0, |started| started.elapsed().as_secs_f64());
        let status = result.resolve_status();

        self.storage.update_query_result(id, status, elapsed)?;
        self.state = SessionState::Completed;
        tracing::debug!(query_id = %id, %status, duration_secs = elapsed, "query completed");
        Ok(status)
    }

    fn running_query(&self, operation: &str) -> Result<QueryId, SessionError> {
        match (self.state, self.query_id) {
            (SessionState::Running, Some(id)) => Ok(id),
            _ => Err(self.out_of_order(operation)),
        }
    }

    fn out_of_order(&self, operation: &str) -> SessionError {
        SessionError::Logic(format!("{operation} called on a {} session", self.state.as_str()))
    }
}
