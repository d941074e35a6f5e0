use chrono::{DateTime, FixedOffset};
use querylog_core::{
    format_timestamp, ErrorMessageId, ErrorMessageRecord, MessageId, MessageRecord, QueryId,
};
use rusqlite::params;

use super::{get_conn, log_row_error, parse_timestamp, Storage};
use crate::StorageError;

impl Storage {
    /// Append an informational message to a query.
    ///
    /// # Errors
    /// Returns [`StorageError::ConstraintViolation`] if `query_id` does not
    /// reference an existing query.
    pub fn insert_message(
        &self,
        query_id: QueryId,
        logged_at: &DateTime<FixedOffset>,
        message: &str,
        detailed_message: &str,
    ) -> Result<MessageId, StorageError> {
        let conn = get_conn(&self.pool)?;
        let id: i64 = conn.query_row(
            "INSERT INTO message (query_id, date, message, detailed_message)
               VALUES (?1, ?2, ?3, ?4)
               RETURNING message_id",
            params![query_id.get(), format_timestamp(logged_at), message, detailed_message],
            |row| row.get(0),
        )?;
        Ok(MessageId(id))
    }

    /// Append an engine error to a query.
    ///
    /// # Errors
    /// Returns [`StorageError::ConstraintViolation`] if `query_id` does not
    /// reference an existing query.
    pub fn insert_error_message(
        &self,
        query_id: QueryId,
        logged_at: &DateTime<FixedOffset>,
        detailed_message: &str,
        description_message: &str,
        line: i64,
    ) -> Result<ErrorMessageId, StorageError> {
        let conn = get_conn(&self.pool)?;
        let id: i64 = conn.query_row(
            "INSERT INTO errmessage (query_id, date, detailed_message, description_message, line)
               VALUES (?1, ?2, ?3, ?4, ?5)
               RETURNING errmessage_id",
            params![
                query_id.get(),
                format_timestamp(logged_at),
                detailed_message,
                description_message,
                line
            ],
            |row| row.get(0),
        )?;
        Ok(ErrorMessageId(id))
    }

    /// Messages of one query in the order they were logged.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn messages_for_query(&self, query_id: QueryId) -> Result<Vec<MessageRecord>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT message_id, query_id, date, message, detailed_message
               FROM message WHERE query_id = ?1 ORDER BY message_id",
        )?;
        let results = stmt
            .query_map(params![query_id.get()], |row| {
                Ok(MessageRecord {
                    id: MessageId(row.get(0)?),
                    query_id: QueryId(row.get(1)?),
                    logged_at: parse_timestamp(row, 2)?,
                    message: row.get(3)?,
                    detailed_message: row.get(4)?,
                })
            })?
            .filter_map(log_row_error)
            .collect();
        Ok(results)
    }

    /// Errors of one query in the order they were logged.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn error_messages_for_query(
        &self,
        query_id: QueryId,
    ) -> Result<Vec<ErrorMessageRecord>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT errmessage_id, query_id, date, detailed_message, description_message, line
               FROM errmessage WHERE query_id = ?1 ORDER BY errmessage_id",
        )?;
        let results = stmt
            .query_map(params![query_id.get()], |row| {
                Ok(ErrorMessageRecord {
                    id: ErrorMessageId(row.get(0)?),
                    query_id: QueryId(row.get(1)?),
                    logged_at: parse_timestamp(row, 2)?,
                    detailed_message: row.get(3)?,
                    description_message: row.get(4)?,
                    line: row.get(5)?,
                })
            })?
            .filter_map(log_row_error)
            .collect();
        Ok(results)
    }
}
