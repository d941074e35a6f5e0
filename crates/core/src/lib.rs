//! Core types for querylog
//!
//! Domain records shared by the storage and service crates, the execution
//! result bitmask reported by the query engine, and environment-driven
//! configuration.

mod config;
pub mod constants;
mod env_config;
mod error;
mod execution_result;
mod query;

pub use config::*;
pub use error::*;
pub use execution_result::*;
pub use query::*;
