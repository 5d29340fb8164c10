//! Event definitions
//!
//! Every cell of a run holds one event. Sends and receives are paired by a
//! shared sequence number (`s3` is received by `r3`); internal events have
//! no cross-process link; `NULL` marks a slot after the process has ended.
//!
//! Text form:
//! - `NULL` is the null event
//! - `s<digits>` is a send, `r<digits>` the matching receive
//! - any other non-empty label names an internal event

use std::fmt;

use crate::{MatrixError, MatrixResult, Position};

/// Literal label of the null event
pub const NULL_LABEL: &str = "NULL";

/// Event kind and label
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// Message send, matched by the receive with the same sequence number
    Send(u64),
    /// Message receive, matched by the send with the same sequence number
    Receive(u64),
    /// Local event, named by its label
    Internal(String),
    /// No event in this slot
    Null,
}

impl Event {
    /// Parse a label, reporting empty labels against their position
    pub fn parse_at(label: &str, position: Position) -> MatrixResult<Self> {
        if label.is_empty() {
            return Err(MatrixError::EmptyLabel(position));
        }
        Ok(Self::parse(label))
    }

    /// Parse a non-empty label
    pub fn parse(label: &str) -> Self {
        if label == NULL_LABEL {
            return Event::Null;
        }

        let mut chars = label.chars();
        let tag = chars.next();
        let digits = chars.as_str();
        let seq = if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            digits.parse::<u64>().ok()
        } else {
            None
        };

        match (tag, seq) {
            (Some('s'), Some(seq)) => Event::Send(seq),
            (Some('r'), Some(seq)) => Event::Receive(seq),
            _ => Event::Internal(label.to_string()),
        }
    }

    pub fn internal(name: impl Into<String>) -> Self {
        Event::Internal(name.into())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Event::Null)
    }

    #[inline]
    pub fn is_send(&self) -> bool {
        matches!(self, Event::Send(_))
    }

    #[inline]
    pub fn is_receive(&self) -> bool {
        matches!(self, Event::Receive(_))
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(self, Event::Internal(_))
    }

    /// Sequence number linking a send to its receive
    pub fn seq(&self) -> Option<u64> {
        match self {
            Event::Send(seq) | Event::Receive(seq) => Some(*seq),
            _ => None,
        }
    }

    /// The other half of a send/receive pair
    pub fn peer(&self) -> Option<Event> {
        match self {
            Event::Send(seq) => Some(Event::Receive(*seq)),
            Event::Receive(seq) => Some(Event::Send(*seq)),
            _ => None,
        }
    }

    /// Label as printed in a matrix
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl Default for Event {
    fn default() -> Self {
        Event::Null
    }
}

impl From<&str> for Event {
    fn from(label: &str) -> Self {
        Event::parse(label)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Send(seq) => write!(f, "s{}", seq),
            Event::Receive(seq) => write!(f, "r{}", seq),
            Event::Internal(name) => f.write_str(name),
            Event::Null => f.write_str(NULL_LABEL),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Send(seq) => write!(f, "Send({})", seq),
            Event::Receive(seq) => write!(f, "Receive({})", seq),
            Event::Internal(name) => write!(f, "Internal({})", name),
            Event::Null => f.write_str("Null"),
        }
    }
}

/// Name of the `index`-th internal event: a..z, then aa, ab, ..
pub fn internal_name(index: usize) -> String {
    let mut n = index + 1;
    let mut name = Vec::new();
    while n > 0 {
        n -= 1;
        name.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
