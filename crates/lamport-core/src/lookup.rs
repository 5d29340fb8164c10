//! Event lookup - label to position index
//!
//! Built once per run and shared read-only by every worker.

use std::collections::HashMap;

use crate::{Event, EventMatrix, MatrixError, MatrixResult, Position};

/// Maps every non-NULL event to the cell it occupies
#[derive(Clone, Debug, Default)]
pub struct EventLookup {
    positions: HashMap<Event, Position>,
}

impl EventLookup {
    /// Index a matrix, rejecting labels that occur more than once
    pub fn build(matrix: &EventMatrix) -> MatrixResult<Self> {
        let mut positions = HashMap::with_capacity(matrix.len());

        for (pos, event) in matrix.cells() {
            if event.is_null() {
                continue;
            }
            if let Some(&first) = positions.get(event) {
                return Err(MatrixError::DuplicateEvent {
                    event: event.clone(),
                    first,
                    second: pos,
                });
            }
            positions.insert(event.clone(), pos);
        }

        Ok(EventLookup { positions })
    }

    pub fn position(&self, event: &Event) -> Option<Position> {
        self.positions.get(event).copied()
    }

    /// Where the other half of a send/receive pair lives
    pub fn peer_position(&self, event: &Event) -> Option<Position> {
        event.peer().and_then(|peer| self.position(&peer))
    }

    pub fn contains(&self, event: &Event) -> bool {
        self.positions.contains_key(event)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_label_rejected() {
        let m = EventMatrix::parse(2, 2, &[["a", "s1"], ["a", "r1"]]).unwrap();
        let err = EventLookup::build(&m).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DuplicateEvent {
                event: Event::internal("a"),
                first: Position::new(0, 0),
                second: Position::new(1, 0),
            }
        );
    }

    #[test]
    fn test_nulls_not_indexed() {
        let m = EventMatrix::parse(2, 2, &[["a", "NULL"], ["b", "NULL"]]).unwrap();
        let lookup = EventLookup::build(&m).unwrap();
        assert_eq!(lookup.len(), 2);
        assert!(!lookup.contains(&Event::Null));
    }

    #[test]
    fn test_peer_position() {
        let m = EventMatrix::parse(2, 2, &[["s1", "a"], ["b", "r1"]]).unwrap();
        let lookup = EventLookup::build(&m).unwrap();
        assert_eq!(lookup.peer_position(&Event::Receive(1)), Some(Position::new(0, 0)));
        assert_eq!(lookup.peer_position(&Event::Send(1)), Some(Position::new(1, 1)));
        assert_eq!(lookup.peer_position(&Event::internal("a")), None);
    }
}
