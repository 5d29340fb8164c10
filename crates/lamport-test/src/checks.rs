//! Causal-order checks for computed clock matrices

use lamport_core::{ClockMatrix, Event, EventLookup, EventMatrix, LamportTime, Position};
use thiserror::Error;

/// A broken Lamport clock law
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Shape mismatch: events {events:?}, clocks {clocks:?}")]
    ShapeMismatch {
        events: (usize, usize),
        clocks: (usize, usize),
    },

    #[error("NULL and zero disagree at {0}")]
    NullMismatch(Position),

    #[error("Timestamp at {0} does not increase along its process")]
    NotIncreasing(Position),

    #[error("Receive at {receive} is not after its send at {send}")]
    ReceiveBeforeSend { send: Position, receive: Position },

    #[error("Timestamp at {position} is {actual}, Lamport's rule gives {expected}")]
    RuleBroken {
        position: Position,
        expected: LamportTime,
        actual: LamportTime,
    },

    #[error("Event lookup failed: {0}")]
    Lookup(String),
}

/// Check `clocks` against the events it was computed from
///
/// - NULL slots, and only they, are zero
/// - timestamps strictly increase along each process
/// - every receive is later than its send
/// - every timestamp is exactly `max(predecessor, send) + 1`
pub fn check_causal_order(events: &EventMatrix, clocks: &ClockMatrix) -> Result<(), Violation> {
    if (events.rows(), events.cols()) != (clocks.rows(), clocks.cols()) {
        return Err(Violation::ShapeMismatch {
            events: (events.rows(), events.cols()),
            clocks: (clocks.rows(), clocks.cols()),
        });
    }

    let lookup = EventLookup::build(events).map_err(|e| Violation::Lookup(e.to_string()))?;
    let ts = |pos: Position| clocks.get(pos).copied().unwrap_or(LamportTime::ZERO);

    for (pos, event) in events.cells() {
        let actual = ts(pos);
        if event.is_null() != !actual.is_set() {
            return Err(Violation::NullMismatch(pos));
        }
        if event.is_null() {
            continue;
        }

        let pred = pos.previous().map(ts).unwrap_or(LamportTime::ZERO);
        if actual <= pred {
            return Err(Violation::NotIncreasing(pos));
        }

        let expected = match event {
            Event::Receive(_) => {
                let send = lookup
                    .peer_position(event)
                    .ok_or_else(|| Violation::Lookup(format!("no send for {}", event)))?;
                if actual <= ts(send) {
                    return Err(Violation::ReceiveBeforeSend { send, receive: pos });
                }
                pred.witness(ts(send))
            }
            _ => pred.next(),
        };
        if actual != expected {
            return Err(Violation::RuleBroken {
                position: pos,
                expected,
                actual,
            });
        }
    }

    Ok(())
}

/// Whether two event matrices have NULL in exactly the same slots
pub fn same_nulls(a: &EventMatrix, b: &EventMatrix) -> bool {
    (a.rows(), a.cols()) == (b.rows(), b.cols())
        && a.cells().zip(b.cells()).all(|((_, x), (_, y))| x.is_null() == y.is_null())
}

/// Every `r<k>` has an `s<k>` one tick earlier and vice versa
pub fn pairs_are_adjacent(events: &EventMatrix, clocks: &ClockMatrix) -> bool {
    let Ok(lookup) = EventLookup::build(events) else {
        return false;
    };
    events.cells().all(|(pos, event)| match event {
        Event::Send(_) | Event::Receive(_) => {
            let Some(peer) = lookup.peer_position(event) else {
                return false;
            };
            let (send, receive) = if event.is_send() {
                (pos, peer)
            } else {
                (peer, pos)
            };
            match (clocks.get(send), clocks.get(receive)) {
                (Some(s), Some(r)) => s.next() == *r,
                _ => false,
            }
        }
        _ => true,
    })
}
