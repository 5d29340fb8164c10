//! End-to-end scenarios on the fixed 3x4 runs

use lamport_core::{ClockMatrix, Event, EventMatrix, Position};
use lamport_time::{compute, ClockComputer, ClockConfig};
use lamport_verify::{reconstruct, Rejection, INCORRECT};

fn clocks(values: [[u64; 4]; 3]) -> ClockMatrix {
    ClockMatrix::from_values(3, 4, values).unwrap()
}

#[test]
fn test_labelled_run_computes_expected_clocks() {
    let events = EventMatrix::parse(
        3,
        4,
        &[
            ["a", "s1", "r3", "b"],
            ["c", "r2", "s3", "NULL"],
            ["r1", "d", "s2", "e"],
        ],
    )
    .unwrap();

    let result = compute(&events).unwrap();
    assert_eq!(result, clocks([[1, 2, 8, 9], [1, 6, 7, 0], [3, 4, 5, 6]]));
}

#[test]
fn test_every_cell_resolves() {
    let events = reconstruct(&clocks([[1, 2, 8, 9], [1, 6, 7, 0], [3, 4, 5, 6]])).unwrap();

    let mut sends = Vec::new();
    let mut receives = Vec::new();
    for (_, event) in events.cells() {
        match event {
            Event::Send(seq) => sends.push(*seq),
            Event::Receive(seq) => receives.push(*seq),
            Event::Internal(name) => assert_eq!(name.len(), 1),
            Event::Null => {}
        }
    }
    sends.sort_unstable();
    receives.sort_unstable();
    assert_eq!(sends, vec![1, 2, 3]);
    assert_eq!(sends, receives);
}

#[test]
fn test_shifted_candidate_changes_outcome() {
    let base = reconstruct(&clocks([[1, 2, 8, 9], [1, 6, 7, 0], [3, 4, 5, 6]]));
    let shifted = reconstruct(&clocks([[1, 2, 8, 9], [1, 6, 7, 0], [2, 4, 5, 6]]));

    assert!(base.is_ok());
    let err = shifted.unwrap_err();
    assert_eq!(err.token(), INCORRECT);
    assert!(matches!(
        err,
        Rejection::NoMatchingSend { position, .. } if position == Position::new(2, 1)
    ));
}

#[test]
fn test_third_demo_case() {
    let events = reconstruct(&clocks([[1, 2, 8, 9], [1, 6, 7, 0], [2, 3, 4, 5]])).unwrap();
    assert_eq!(events.to_string(), "s1 b r3 e\na r2 s3 NULL\nr1 c d s2");
}

#[test]
fn test_reconstruction_computes_back() {
    let original = clocks([[1, 2, 8, 9], [1, 6, 7, 0], [2, 3, 4, 5]]);
    let events = reconstruct(&original).unwrap();
    let recomputed = ClockComputer::with_config(ClockConfig::strict())
        .compute(&events)
        .unwrap();
    assert_eq!(recomputed, original);
}
