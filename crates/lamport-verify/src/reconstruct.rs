//! Timestamp reconstruction pipeline
//!
//! Traversal order is part of the contract: both labelling passes walk
//! the matrix column by column (rows inner), while the send search walks
//! candidates row by row. Matching is first-fit with no backtracking, so
//! a realisable matrix can still be rejected when an early receive claims
//! the send a later one needed.

use lamport_core::{
    internal_name, ClockMatrix, Event, EventMatrix, LamportTime, Matrix, MatrixResult, Position,
};
use tracing::debug;

use crate::{Rejection, VerifyResult};

/// Working label of a cell between passes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum Label {
    /// Still a raw timestamp; becomes an internal event
    #[default]
    Open,
    Null,
    Send(u64),
    Receive(u64),
}

/// Successful reconstruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconstruction {
    /// Inferred events, same shape as the input
    pub events: EventMatrix,
    /// Matched pairs as (send, receive), in matching order
    pub pairs: Vec<(Position, Position)>,
    /// Number of internal events named
    pub internals: usize,
    /// Number of NULL slots
    pub nulls: usize,
}

/// Timestamp Reconstructor
#[derive(Clone, Copy, Debug, Default)]
pub struct Reconstructor;

impl Reconstructor {
    pub fn new() -> Self {
        Reconstructor
    }

    /// Infer an event labelling for `clocks`
    pub fn reconstruct(&self, clocks: &ClockMatrix) -> VerifyResult<EventMatrix> {
        self.run(clocks).map(|r| r.events)
    }

    /// Same as [`reconstruct`](Self::reconstruct) from raw integers
    pub fn reconstruct_values<I, R, V>(
        &self,
        rows: usize,
        cols: usize,
        values: I,
    ) -> VerifyResult<EventMatrix>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: std::borrow::Borrow<u64>,
    {
        let clocks: MatrixResult<ClockMatrix> = ClockMatrix::from_values(rows, cols, values);
        self.reconstruct(&clocks?)
    }

    /// Run the full pipeline, keeping the matching details
    pub fn run(&self, clocks: &ClockMatrix) -> VerifyResult<Reconstruction> {
        let result = self.run_inner(clocks);
        if let Err(rejection) = &result {
            debug!(%rejection, "reconstruction rejected");
        }
        result
    }

    fn run_inner(&self, clocks: &ClockMatrix) -> VerifyResult<Reconstruction> {
        // Stage 1: Row validation
        check_rows(clocks)?;

        // Stage 2: Send/receive matching
        let must_receive = clocks.map(|pos, &t| t.is_set() && !continues(clocks, pos, t));
        let mut labels: Matrix<Label> = Matrix::new(clocks.rows(), clocks.cols());
        let mut pairs = Vec::new();
        let mut nulls = 0;

        for pos in clocks.column_major() {
            let t = at(clocks, pos);
            if !t.is_set() {
                labels.set(pos, Label::Null);
                nulls += 1;
                continue;
            }
            if !is_true(&must_receive, pos) {
                continue;
            }

            let send = find_send(clocks, &labels, &must_receive, t).ok_or(
                Rejection::NoMatchingSend {
                    position: pos,
                    timestamp: t,
                },
            )?;

            let seq = pairs.len() as u64 + 1;
            labels.set(send, Label::Send(seq));
            labels.set(pos, Label::Receive(seq));
            pairs.push((send, pos));
            debug!(seq, send = %send, receive = %pos, ts = t.value(), "matched");
        }

        // Stage 3: Internal naming
        let mut internals = 0;
        let mut names: Matrix<Option<String>> = Matrix::new(clocks.rows(), clocks.cols());
        for pos in clocks.column_major() {
            if labels.get(pos) == Some(&Label::Open) {
                names.set(pos, Some(internal_name(internals)));
                internals += 1;
            }
        }

        let events = labels.map(|pos, label| match label {
            Label::Null => Event::Null,
            Label::Send(seq) => Event::Send(*seq),
            Label::Receive(seq) => Event::Receive(*seq),
            Label::Open => Event::Internal(names.get(pos).cloned().flatten().unwrap_or_default()),
        });

        Ok(Reconstruction {
            events,
            pairs,
            internals,
            nulls,
        })
    }
}

/// Timestamp at `pos`, zero out of bounds
#[inline]
fn at(clocks: &ClockMatrix, pos: Position) -> LamportTime {
    clocks.get(pos).copied().unwrap_or(LamportTime::ZERO)
}

#[inline]
fn is_true(flags: &Matrix<bool>, pos: Position) -> bool {
    flags.get(pos).copied().unwrap_or(false)
}

/// Non-zero timestamps never decrease along a row, and nothing follows a zero
fn check_rows(clocks: &ClockMatrix) -> VerifyResult<()> {
    for (process, row) in clocks.rows_iter().enumerate() {
        let mut last = LamportTime::ZERO;
        for (slot, &t) in row.iter().enumerate() {
            if t.is_set() && t < last {
                return Err(Rejection::NotMonotonic {
                    process,
                    position: Position::new(process, slot),
                });
            }
            last = last.max(t);
        }

        if let Some(first_null) = row.iter().position(|t| !t.is_set()) {
            if let Some(offset) = row[first_null..].iter().position(|t| t.is_set()) {
                return Err(Rejection::EventAfterNull {
                    position: Position::new(process, first_null + offset),
                });
            }
        }
    }
    Ok(())
}

/// Whether `t` at `pos` simply follows its own process's previous slot
fn continues(clocks: &ClockMatrix, pos: Position, t: LamportTime) -> bool {
    match pos.previous() {
        None => t == LamportTime::FIRST,
        Some(prev) => t.previous() == Some(at(clocks, prev)),
    }
}

/// First unclaimed cell, row by row, holding `t - 1`
///
/// Zero cells and cells that must themselves be receives never qualify.
fn find_send(
    clocks: &ClockMatrix,
    labels: &Matrix<Label>,
    must_receive: &Matrix<bool>,
    t: LamportTime,
) -> Option<Position> {
    let want = t.previous().filter(|w| w.is_set())?;
    clocks
        .cells()
        .filter(|(_, value)| **value == want)
        .map(|(pos, _)| pos)
        .find(|&pos| labels.get(pos) == Some(&Label::Open) && !is_true(must_receive, pos))
}

/// Reconstruct with the default reconstructor
pub fn reconstruct(clocks: &ClockMatrix) -> VerifyResult<EventMatrix> {
    Reconstructor::new().reconstruct(clocks)
}

#[cfg(test)]
mod tests {
    use crate::INCORRECT;
    use super::*;

    fn labels(events: &EventMatrix) -> Vec<Vec<String>> {
        events
            .rows_iter()
            .map(|row| row.iter().map(Event::label).collect())
            .collect()
    }

    fn run(rows: usize, cols: usize, values: &[&[u64]]) -> VerifyResult<EventMatrix> {
        Reconstructor::new().reconstruct_values(rows, cols, values.iter().map(|row| row.iter()))
    }

    #[test]
    fn test_sample_reconstruction() {
        let events = run(3, 4, &[&[1, 2, 8, 9], &[1, 6, 7, 0], &[3, 4, 5, 6]]).unwrap();
        assert_eq!(
            labels(&events),
            vec![
                vec!["a", "s1", "r3", "d"],
                vec!["b", "r2", "s3", "NULL"],
                vec!["r1", "c", "s2", "e"],
            ]
        );
    }

    #[test]
    fn test_shifted_process_reconstruction() {
        let events = run(3, 4, &[&[1, 2, 8, 9], &[1, 6, 7, 0], &[2, 3, 4, 5]]).unwrap();
        assert_eq!(
            labels(&events),
            vec![
                vec!["s1", "b", "r3", "e"],
                vec!["a", "r2", "s3", "NULL"],
                vec!["r1", "c", "d", "s2"],
            ]
        );
    }

    #[test]
    fn test_greedy_rejects_missing_send() {
        let err = run(3, 4, &[&[1, 2, 8, 9], &[1, 6, 7, 0], &[2, 4, 5, 6]]).unwrap_err();
        assert_eq!(
            err,
            Rejection::NoMatchingSend {
                position: Position::new(2, 1),
                timestamp: LamportTime(4),
            }
        );
        assert_eq!(err.token(), "INCORRECT");
    }

    #[test]
    fn test_decreasing_row_rejected() {
        let err = run(1, 3, &[&[5, 2, 9]]).unwrap_err();
        assert!(matches!(err, Rejection::NotMonotonic { process: 0, .. }));
    }

    #[test]
    fn test_value_after_zero_rejected() {
        let err = run(1, 3, &[&[1, 0, 3]]).unwrap_err();
        assert_eq!(
            err,
            Rejection::EventAfterNull {
                position: Position::new(0, 2)
            }
        );
    }

    #[test]
    fn test_ragged_input_rejected() {
        let err = run(2, 2, &[&[1, 2], &[1]]).unwrap_err();
        assert!(matches!(err, Rejection::Malformed(_)));
        assert_eq!(err.token(), INCORRECT);
    }

    #[test]
    fn test_all_null() {
        let events = run(2, 2, &[&[0, 0], &[0, 0]]).unwrap();
        assert!(events.rows_iter().flatten().all(Event::is_null));
    }

    #[test]
    fn test_each_send_claimed_once() {
        // Two receives at 3 but only one cell holds 2
        let err = run(3, 2, &[&[1, 2], &[3, 0], &[3, 0]]).unwrap_err();
        assert!(matches!(
            err,
            Rejection::NoMatchingSend { position, .. } if position == Position::new(2, 0)
        ));
    }

    #[test]
    fn test_receive_cell_never_claimed_as_send() {
        // (0, 1) holds 4 but must itself be a receive, so the receive at 5
        // in process 1 takes the internal 4 at the end of process 2
        let clocks = ClockMatrix::from_values(
            3,
            4,
            [[1u64, 4, 0, 0], [5, 0, 0, 0], [1, 2, 3, 4]],
        )
        .unwrap();
        let result = Reconstructor::new().run(&clocks).unwrap();
        assert_eq!(
            result.pairs,
            vec![
                (Position::new(2, 3), Position::new(1, 0)),
                (Position::new(2, 2), Position::new(0, 1)),
            ]
        );
        assert_eq!(result.events.get(Position::new(0, 1)), Some(&Event::Receive(2)));
        assert_eq!(result.events.get(Position::new(2, 3)), Some(&Event::Send(1)));
    }

    #[test]
    fn test_equal_neighbours_need_send() {
        // [1, 1] cannot be two consecutive events of one process
        let err = run(1, 2, &[&[1, 1]]).unwrap_err();
        assert!(matches!(err, Rejection::NoMatchingSend { .. }));
    }

    #[test]
    fn test_internal_names_continue_past_z() {
        let row: Vec<u64> = (1..=28).collect();
        let events = run(1, 28, &[row.as_slice()]).unwrap();
        assert_eq!(events.get(Position::new(0, 25)), Some(&Event::internal("z")));
        assert_eq!(events.get(Position::new(0, 27)), Some(&Event::internal("ab")));
    }

    #[test]
    fn test_deterministic() {
        let clocks =
            ClockMatrix::from_values(3, 4, [[1u64, 2, 8, 9], [1, 6, 7, 0], [3, 4, 5, 6]]).unwrap();
        let first = reconstruct(&clocks).unwrap();
        let second = reconstruct(&clocks).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_counts() {
        let clocks =
            ClockMatrix::from_values(3, 4, [[1u64, 2, 8, 9], [1, 6, 7, 0], [3, 4, 5, 6]]).unwrap();
        let result = Reconstructor::new().run(&clocks).unwrap();
        assert_eq!(result.pairs.len(), 3);
        assert_eq!(result.internals, 5);
        assert_eq!(result.nulls, 1);
    }
}
