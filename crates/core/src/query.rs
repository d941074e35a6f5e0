use std::fmt;

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::ExecutionResult;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

row_id!(
    /// Store-generated key of a `query` row.
    QueryId
);
row_id!(
    /// Store-generated key of a `message` row.
    MessageId
);
row_id!(
    /// Store-generated key of an `errmessage` row.
    ErrorMessageId
);

/// Current local time, keeping the UTC offset the row is stamped with.
#[must_use]
pub fn timestamp_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// ISO-8601 with offset, e.g. `2024-05-01T09:30:12.123456+02:00`.
#[must_use]
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Fields captured when a batch starts executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuery {
    pub started_at: DateTime<FixedOffset>,
    pub server: String,
    pub database: String,
    pub connection_string: String,
    pub query_text: String,
}

impl NewQuery {
    #[must_use]
    pub fn new(
        started_at: DateTime<FixedOffset>,
        server: impl Into<String>,
        database: impl Into<String>,
        connection_string: impl Into<String>,
        query_text: impl Into<String>,
    ) -> Self {
        Self {
            started_at,
            server: server.into(),
            database: database.into(),
            connection_string: connection_string.into(),
            query_text: query_text.into(),
        }
    }

    /// Name of the first required field that is empty, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("server", &self.server),
            ("db", &self.database),
            ("connection_string", &self.connection_string),
            ("query_text", &self.query_text),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

/// One executed batch as persisted in the `query` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: QueryId,
    pub started_at: DateTime<FixedOffset>,
    pub server: String,
    pub database: String,
    pub connection_string: String,
    pub query_text: String,
    /// Resolved terminal status; `None` while the batch is still running.
    pub status: Option<ExecutionResult>,
    /// Elapsed seconds; `None` while the batch is still running.
    pub duration_secs: Option<f64>,
    /// Reserved, nothing populates it yet.
    pub rows_affected: Option<i64>,
}

impl QueryRecord {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_some()
    }
}

/// Informational message attached to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub query_id: QueryId,
    pub logged_at: DateTime<FixedOffset>,
    pub message: Option<String>,
    pub detailed_message: Option<String>,
}

/// Error reported by the engine while a query ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessageRecord {
    pub id: ErrorMessageId,
    pub query_id: QueryId,
    pub logged_at: DateTime<FixedOffset>,
    pub detailed_message: Option<String>,
    pub description_message: Option<String>,
    pub line: i64,
}
