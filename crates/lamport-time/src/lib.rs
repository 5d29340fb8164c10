//! Lamport Time - Concurrent logical clock computer
//!
//! This crate assigns Lamport timestamps to a matrix of events:
//! - One worker thread per process, walking its slots in order
//! - A single lock-guarded clock state shared by every worker
//! - Send/receive handshakes over a condition variable
//! - Deadlock detection and bounded receive waits

pub mod config;
pub mod error;
mod state;
pub mod engine;

pub use config::*;
pub use error::*;
pub(crate) use state::ClockState;
pub use engine::*;
