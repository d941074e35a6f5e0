//! Storage layer for querylog
//!
//! One `SQLite` file shared by every window that executes queries. The
//! database runs in WAL mode with foreign keys enforced, so several
//! processes can append to it at once while readers keep reading.

mod error;
mod migrations;
mod storage;
#[cfg(test)]
mod tests;

pub use error::StorageError;
pub use migrations::SCHEMA_VERSION;
pub use storage::Storage;
