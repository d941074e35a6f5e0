//! Store configuration resolved from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_FILE_NAME, DEFAULT_POOL_SIZE, ENV_BUSY_TIMEOUT_MS,
    ENV_DB_PATH, ENV_DB_POOL_SIZE,
};
use crate::env_config::parse_with_default;
use crate::error::ConfigError;

/// Where the store lives and how connections to it behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub pool_size: u32,
    pub busy_timeout_ms: u32,
}

impl StoreConfig {
    /// Configuration for an explicit store path with default pool settings.
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Resolve configuration from `QUERYLOG_*` environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoHomeDirectory`] when no path override is set
    /// and the home directory cannot be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// See [`StoreConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path.trim()),
            None => default_db_path()?,
        };
        let pool_size =
            parse_with_default(ENV_DB_POOL_SIZE, lookup(ENV_DB_POOL_SIZE).as_deref(), DEFAULT_POOL_SIZE);
        let busy_timeout_ms = parse_with_default(
            ENV_BUSY_TIMEOUT_MS,
            lookup(ENV_BUSY_TIMEOUT_MS).as_deref(),
            DEFAULT_BUSY_TIMEOUT_MS,
        );

        let config = Self { db_path, pool_size, busy_timeout_ms };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    #[must_use]
    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u32) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    /// # Errors
    /// Returns [`ConfigError::Invalid`] for a zero-sized pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid(format!("{ENV_DB_POOL_SIZE} must be at least 1")));
        }
        Ok(())
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.busy_timeout_ms))
    }
}

/// `~/ssms-querylogger.sqlite`
///
/// # Errors
/// Returns [`ConfigError::NoHomeDirectory`] if the platform reports no home.
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DB_FILE_NAME))
        .ok_or(ConfigError::NoHomeDirectory(ENV_DB_PATH))
}
