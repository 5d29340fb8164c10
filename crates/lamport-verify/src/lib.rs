//! Lamport Verify - Timestamp reconstruction
//!
//! This crate runs the clock computer backwards: given only a matrix of
//! Lamport timestamps it infers a labelling of sends, receives, internal
//! and NULL events that could have produced it:
//! - Row validation (monotonic timelines, nothing after NULL)
//! - Greedy first-fit send/receive matching
//! - Internal event naming
//!
//! Every failure is reported as the single outcome `INCORRECT`.

pub mod error;
pub mod reconstruct;

pub use error::*;
pub use reconstruct::*;
