//! Service layer for querylog
//!
//! Turns the engine's per-batch events into store writes: one
//! [`LogSession`] per batch, looked up through a [`SessionRegistry`] that
//! never keeps a finished batch alive, behind a [`QueryLogger`] that never
//! lets a logging failure reach the host.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod batch;
mod error;
mod logger;
mod registry;
mod session;

pub use batch::{BatchHandle, BatchId};
pub use error::SessionError;
pub use logger::{BatchEvents, QueryLogger};
pub use registry::{SessionRegistry, SharedSession};
pub use session::{LogSession, SessionState};
