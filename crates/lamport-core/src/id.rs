//! Position of an event inside a run
//!
//! A run is a fixed grid: one row per process, one column per time slot.

use std::fmt;

/// Cell coordinates - process (row) and slot (column)
///
/// Ordering is row-major: every slot of process 0 sorts before process 1.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub process: usize,
    pub slot: usize,
}

impl Position {
    #[inline]
    pub fn new(process: usize, slot: usize) -> Self {
        Position { process, slot }
    }

    /// Slot immediately before this one in the same process
    #[inline]
    pub fn previous(self) -> Option<Position> {
        self.slot
            .checked_sub(1)
            .map(|slot| Position::new(self.process, slot))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}[{}]", self.process, self.slot)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.process, self.slot)
    }
}
