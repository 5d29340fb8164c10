//! Error types for clock computation

use std::time::Duration;

use lamport_core::{Event, MatrixError, Position};
use thiserror::Error;

/// Clock computer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Malformed event matrix: {0}")]
    Malformed(#[from] MatrixError),

    #[error("Deadlock: {} process(es) blocked on receives whose sends never run", .waiting.len())]
    Deadlock { waiting: Vec<(Position, Event)> },

    #[error("Receive {event} at {position} waited longer than {timeout:?} for its send")]
    ReceiveTimeout {
        event: Event,
        position: Position,
        timeout: Duration,
    },

    #[error("Worker for process {0} panicked")]
    WorkerPanicked(usize),
}

/// Result type for clock computation
pub type ClockResult<T> = Result<T, ClockError>;
