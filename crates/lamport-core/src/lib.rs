//! Lamport Core - Fundamental types for causal event ordering
//!
//! This crate defines the data model shared by the clock computer and the
//! timestamp reconstructor:
//! - Positions (process, slot) inside a run
//! - Logical time (LamportTime)
//! - Events (send, receive, internal, null) and their labels
//! - Rectangular matrices of events and timestamps
//! - The label-to-position lookup built once per run

pub mod id;
pub mod time;
pub mod event;
pub mod matrix;
pub mod lookup;
pub mod error;

pub use id::*;
pub use time::*;
pub use event::*;
pub use matrix::*;
pub use lookup::*;
pub use error::*;
