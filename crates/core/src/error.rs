use thiserror::Error;

/// Errors raised while assembling configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot resolve home directory for the query log store; set {0}")]
    NoHomeDirectory(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
