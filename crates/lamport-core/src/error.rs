//! Error types for the event model

use thiserror::Error;

use crate::{Event, Position};

/// Errors raised while building or validating a matrix of events
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    // Shape errors
    #[error("Row {row} has {actual} slots, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Matrix has {actual} rows, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    // Label errors
    #[error("Empty event label at {0}")]
    EmptyLabel(Position),

    #[error("Event {event} appears at both {first} and {second}")]
    DuplicateEvent {
        event: Event,
        first: Position,
        second: Position,
    },

    // Pairing errors
    #[error("Send {0} has no matching receive")]
    UnmatchedSend(Event),

    #[error("Receive {0} has no matching send")]
    UnmatchedReceive(Event),

    // Timeline errors
    #[error("Event {event} at {position} follows a NULL slot")]
    EventAfterNull { event: Event, position: Position },
}

/// Result type for matrix operations
pub type MatrixResult<T> = Result<T, MatrixError>;
