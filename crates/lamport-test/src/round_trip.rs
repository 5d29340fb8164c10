//! Round trip - compute clocks, reconstruct events, compute again
//!
//! Reconstruction cannot recover the original labels: a receive whose
//! timestamp happens to continue its own process reads back as an
//! internal event. What must survive is the clock matrix itself.

use lamport_core::{ClockMatrix, EventMatrix};
use lamport_time::{ClockComputer, ClockConfig, ClockError};
use lamport_verify::{Reconstructor, Rejection};
use thiserror::Error;

use crate::{check_causal_order, pairs_are_adjacent, same_nulls, Violation};

/// Round-trip failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundTripError {
    #[error("Clock computation failed: {0}")]
    Clock(#[from] ClockError),

    #[error("Reconstruction failed: {0}")]
    Rejected(#[from] Rejection),

    #[error("Computed clocks break causal order: {0}")]
    Causal(#[from] Violation),

    #[error("Reconstructed events moved NULL slots")]
    NullsMoved,

    #[error("Reconstructed pairs are not one tick apart")]
    LoosePairs,

    #[error("Clocks of the reconstruction differ from the original clocks")]
    Diverged {
        original: ClockMatrix,
        recomputed: ClockMatrix,
    },
}

/// Every matrix produced along one round trip
#[derive(Clone, Debug)]
pub struct RoundTripReport {
    pub clocks: ClockMatrix,
    pub reconstructed: EventMatrix,
    pub recomputed: ClockMatrix,
}

/// Round-trip harness
#[derive(Clone, Debug, Default)]
pub struct RoundTrip {
    computer: ClockComputer,
    reconstructor: Reconstructor,
}

impl RoundTrip {
    pub fn new() -> Self {
        Self::with_config(ClockConfig::strict())
    }

    pub fn with_config(config: ClockConfig) -> Self {
        RoundTrip {
            computer: ClockComputer::with_config(config),
            reconstructor: Reconstructor::new(),
        }
    }

    /// Run `events` forward, backward and forward again
    pub fn run(&self, events: &EventMatrix) -> Result<RoundTripReport, RoundTripError> {
        let clocks = self.computer.compute(events)?;
        check_causal_order(events, &clocks)?;

        let reconstructed = self.reconstructor.reconstruct(&clocks)?;
        if !same_nulls(events, &reconstructed) {
            return Err(RoundTripError::NullsMoved);
        }
        if !pairs_are_adjacent(&reconstructed, &clocks) {
            return Err(RoundTripError::LoosePairs);
        }

        let recomputed = self.computer.compute(&reconstructed)?;
        if recomputed != clocks {
            return Err(RoundTripError::Diverged {
                original: clocks,
                recomputed,
            });
        }

        Ok(RoundTripReport {
            clocks,
            reconstructed,
            recomputed,
        })
    }
}
