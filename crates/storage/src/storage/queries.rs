use querylog_core::constants::MAX_RECENT_LIMIT;
use querylog_core::{format_timestamp, ExecutionResult, NewQuery, QueryId, QueryRecord};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension as _};

use super::{get_conn, log_row_error, parse_timestamp, Storage};
use crate::StorageError;

const QUERY_COLUMNS: &str = "query_id, date, server, db, connection_string, query_text, status, duration, rows_affected";

impl Storage {
    /// Insert the row for a batch that just started.
    ///
    /// # Errors
    /// Returns [`StorageError::ConstraintViolation`] if a required field is
    /// empty, or a database error if the insert fails.
    pub fn insert_query(&self, query: &NewQuery) -> Result<QueryId, StorageError> {
        if let Some(field) = query.missing_field() {
            return Err(StorageError::ConstraintViolation(format!("query.{field} is required")));
        }

        let conn = get_conn(&self.pool)?;
        let id: i64 = conn.query_row(
            "INSERT INTO query (date, server, db, connection_string, query_text)
               VALUES (?1, ?2, ?3, ?4, ?5)
               RETURNING query_id",
            params![
                format_timestamp(&query.started_at),
                query.server,
                query.database,
                query.connection_string,
                query.query_text,
            ],
            |row| row.get(0),
        )?;

        tracing::debug!(query_id = id, server = %query.server, db = %query.database, "query row inserted");
        Ok(QueryId(id))
    }

    /// Record the terminal status and elapsed time of a query.
    ///
    /// # Errors
    /// Returns [`StorageError::Logic`] if no row has this id.
    pub fn update_query_result(
        &self,
        id: QueryId,
        status: ExecutionResult,
        duration_secs: f64,
    ) -> Result<(), StorageError> {
        let conn = get_conn(&self.pool)?;
        let affected = conn.execute(
            "UPDATE query SET status = ?1, duration = ?2 WHERE query_id = ?3",
            params![i64::from(status), duration_secs, id.get()],
        )?;
        if affected == 0 {
            return Err(StorageError::Logic(format!("query {id} does not exist")));
        }
        Ok(())
    }

    /// Get query by ID.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_query(&self, id: QueryId) -> Result<Option<QueryRecord>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let record = conn
            .query_row(
                &format!("SELECT {QUERY_COLUMNS} FROM query WHERE query_id = ?1"),
                params![id.get()],
                row_to_query,
            )
            .optional()?;
        Ok(record)
    }

    /// Most recently started queries, newest first.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn recent_queries(&self, limit: usize) -> Result<Vec<QueryRecord>, StorageError> {
        let limit = i64::try_from(limit.min(MAX_RECENT_LIMIT)).unwrap_or(i64::MAX);
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn
            .prepare(&format!("SELECT {QUERY_COLUMNS} FROM query ORDER BY query_id DESC LIMIT ?1"))?;
        let results = stmt
            .query_map(params![limit], row_to_query)?
            .filter_map(log_row_error)
            .collect();
        Ok(results)
    }
}

fn row_to_query(row: &rusqlite::Row<'_>) -> rusqlite::Result<QueryRecord> {
    let status = row
        .get::<_, Option<i64>>(6)?
        .map(|raw| {
            u32::try_from(raw)
                .map(ExecutionResult::from_bits_truncate)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Integer, Box::new(e)))
        })
        .transpose()?;

    Ok(QueryRecord {
        id: QueryId(row.get(0)?),
        started_at: parse_timestamp(row, 1)?,
        server: row.get(2)?,
        database: row.get(3)?,
        connection_string: row.get(4)?,
        query_text: row.get(5)?,
        status,
        duration_secs: row.get(7)?,
        rows_affected: row.get(8)?,
    })
}
