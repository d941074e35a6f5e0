#![allow(
    clippy::redundant_pub_crate,
    reason = "migrations module is private, pub(crate) is intentional"
)]

mod v1;

use rusqlite::{Connection, Transaction, TransactionBehavior};

pub const SCHEMA_VERSION: i32 = 1;

/// Bring the schema up to [`SCHEMA_VERSION`].
///
/// Several windows can open the store at the same moment, so the version
/// check and the DDL run inside one `IMMEDIATE` transaction.
pub(crate) fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let current_version: i32 = tx.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!("Database schema version: {} (target: {})", current_version, SCHEMA_VERSION);

    if current_version > SCHEMA_VERSION {
        tracing::warn!(
            current_version,
            SCHEMA_VERSION,
            "store was created by a newer querylog, leaving schema untouched"
        );
        return tx.commit();
    }

    if current_version < 1i32 {
        tracing::info!("Running migration v1: query, message and errmessage tables");
        tx.execute_batch(v1::SQL)?;
    }

    if current_version < SCHEMA_VERSION {
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    tx.commit()?;
    tracing::info!("Database schema up to date (version {})", SCHEMA_VERSION);

    Ok(())
}
