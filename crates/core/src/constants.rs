//! Shared constants for querylog.

/// Store file name, created directly under the user's home directory.
pub const DEFAULT_DB_FILE_NAME: &str = "ssms-querylogger.sqlite";

/// Overrides the store file location.
pub const ENV_DB_PATH: &str = "QUERYLOG_DB_PATH";

/// Overrides the connection pool size.
pub const ENV_DB_POOL_SIZE: &str = "QUERYLOG_DB_POOL_SIZE";

/// Overrides the `SQLite` busy timeout (milliseconds).
pub const ENV_BUSY_TIMEOUT_MS: &str = "QUERYLOG_BUSY_TIMEOUT_MS";

/// Connection pool: maximum connections per process.
///
/// Each statement holds a connection only for its own duration, so a few
/// connections cover every live batch in one window.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// How long a writer waits on another process's write lock before failing.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

/// Upper bound for read-back listings.
pub const MAX_RECENT_LIMIT: usize = 1000;
