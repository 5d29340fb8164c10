//! Rejection reasons for timestamp reconstruction

use lamport_core::{LamportTime, MatrixError, Position};
use thiserror::Error;

/// The single failure token of a reconstruction
pub const INCORRECT: &str = "INCORRECT";

/// Why a timestamp matrix has no labelling
///
/// All variants are the same outcome, `INCORRECT`; the reason is kept
/// for logs and tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("INCORRECT: {0}")]
    Malformed(#[from] MatrixError),

    #[error("INCORRECT: timestamps of process {process} decrease at {position}")]
    NotMonotonic { process: usize, position: Position },

    #[error("INCORRECT: timestamp at {position} follows a NULL slot")]
    EventAfterNull { position: Position },

    #[error(
        "INCORRECT: no unclaimed send at {} for receive at {position}",
        .timestamp.value().saturating_sub(1)
    )]
    NoMatchingSend {
        position: Position,
        timestamp: LamportTime,
    },
}

impl Rejection {
    /// Outcome token shown to users
    pub fn token(&self) -> &'static str {
        INCORRECT
    }
}

/// Result type for reconstruction
pub type VerifyResult<T> = Result<T, Rejection>;
