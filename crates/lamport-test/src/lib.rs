//! Lamport Test Harness - Random executions and round-trip validation
//!
//! This crate provides:
//! - Random valid execution generation
//! - Causal-order checking of computed clocks
//! - Compute / reconstruct round trips

pub mod generator;
pub mod checks;
pub mod round_trip;

pub use generator::*;
pub use checks::*;
pub use round_trip::*;
