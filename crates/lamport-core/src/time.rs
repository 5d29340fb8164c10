//! Logical time primitive
//!
//! A Lamport timestamp is a positive integer attached to an event.
//! Zero is reserved for "no event" (a NULL slot) or "not yet computed".

use std::fmt;

/// Lamport logical time
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LamportTime(pub u64);

impl LamportTime {
    pub const ZERO: LamportTime = LamportTime(0);
    pub const FIRST: LamportTime = LamportTime(1);

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// True once a real timestamp has been written
    #[inline]
    pub fn is_set(self) -> bool {
        self.0 != 0
    }

    /// Next tick after this one
    #[inline]
    pub fn next(self) -> Self {
        LamportTime(self.0.saturating_add(1))
    }

    /// Tick before this one, `None` for zero
    #[inline]
    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub(1).map(LamportTime)
    }

    /// Receive rule: one past the later of the local predecessor and the send
    #[inline]
    pub fn witness(self, received: LamportTime) -> Self {
        self.max(received).next()
    }
}

impl From<u64> for LamportTime {
    fn from(value: u64) -> Self {
        LamportTime(value)
    }
}

impl fmt::Debug for LamportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L({})", self.0)
    }
}

impl fmt::Display for LamportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
