//! Shared clock state for one run
//!
//! All workers of a run share one `ClockState` behind a single mutex.
//! Every read and write of the clock matrix, the assignment counter and
//! the bookkeeping used for deadlock detection happens under that lock.

use std::collections::BTreeMap;

use lamport_core::{ClockMatrix, Event, LamportTime, Position};

use crate::{ClockError, FirstEventRule};

/// A receive blocked on its send
#[derive(Clone, Debug)]
struct Waiter {
    position: Position,
    event: Event,
    send: Position,
}

/// Mutable state of a clock run
#[derive(Debug)]
pub(crate) struct ClockState {
    /// Timestamps written so far (zero = not yet assigned)
    clocks: ClockMatrix,
    /// Events stamped across the whole run
    assigned: u64,
    /// Workers that have not returned yet
    running: usize,
    /// Receives currently blocked, by process
    waiting: BTreeMap<usize, Waiter>,
    /// First failure; set once, stops every worker
    failure: Option<ClockError>,
}

impl ClockState {
    pub fn new(rows: usize, cols: usize) -> Self {
        ClockState {
            clocks: ClockMatrix::new(rows, cols),
            assigned: 0,
            running: rows,
            waiting: BTreeMap::new(),
            failure: None,
        }
    }

    /// Timestamp at `pos`, zero when unset or out of bounds
    pub fn get(&self, pos: Position) -> LamportTime {
        self.clocks.get(pos).copied().unwrap_or(LamportTime::ZERO)
    }

    pub fn assigned(&self) -> u64 {
        self.assigned
    }

    /// Stamp the event at `pos`
    ///
    /// `received` carries the matched send's timestamp for a receive.
    /// Each cell is written exactly once, by the worker owning its row.
    pub fn stamp(
        &mut self,
        pos: Position,
        received: Option<LamportTime>,
        rule: FirstEventRule,
    ) -> LamportTime {
        debug_assert!(!self.get(pos).is_set(), "cell {} stamped twice", pos);

        let ts = match rule {
            FirstEventRule::GlobalCounter if self.assigned == 0 => LamportTime::FIRST,
            FirstEventRule::GlobalCounter => Self::advance(self.wrapped_predecessor(pos), received),
            FirstEventRule::PerProcess => Self::advance(self.predecessor(pos), received),
        };

        self.clocks.set(pos, ts);
        self.assigned += 1;
        ts
    }

    #[inline]
    fn advance(pred: LamportTime, received: Option<LamportTime>) -> LamportTime {
        match received {
            Some(send) => pred.witness(send),
            None => pred.next(),
        }
    }

    /// Previous slot of the same process, zero before slot 0
    fn predecessor(&self, pos: Position) -> LamportTime {
        pos.previous().map(|p| self.get(p)).unwrap_or(LamportTime::ZERO)
    }

    /// Previous slot, with slot 0 wrapping to the last slot of the row
    fn wrapped_predecessor(&self, pos: Position) -> LamportTime {
        let slot = match pos.slot {
            0 => self.clocks.cols().saturating_sub(1),
            slot => slot - 1,
        };
        self.get(Position::new(pos.process, slot))
    }

    /// Mark a receive as blocked on the send at `send`
    ///
    /// Returns the blocked receives when every running worker is now
    /// waiting on a send that is still unstamped: nobody is left to
    /// stamp one, so the run can never finish. Waiters whose send was
    /// stamped but who have not woken up yet do not count.
    pub fn begin_wait(
        &mut self,
        position: Position,
        event: Event,
        send: Position,
    ) -> Option<Vec<(Position, Event)>> {
        self.waiting.insert(
            position.process,
            Waiter {
                position,
                event,
                send,
            },
        );

        let blocked: Vec<_> = self
            .waiting
            .values()
            .filter(|w| !self.get(w.send).is_set())
            .map(|w| (w.position, w.event.clone()))
            .collect();
        (blocked.len() >= self.running).then_some(blocked)
    }

    pub fn end_wait(&mut self, process: usize) {
        self.waiting.remove(&process);
    }

    pub fn finish_worker(&mut self) {
        self.running = self.running.saturating_sub(1);
    }

    /// Record the first failure of the run; later ones are dropped
    pub fn fail(&mut self, error: ClockError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Hand back the finished matrix, or the failure that stopped the run
    pub fn into_result(self) -> Result<ClockMatrix, ClockError> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self.clocks),
        }
    }
}
