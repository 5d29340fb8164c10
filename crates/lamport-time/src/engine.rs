//! Clock Computer - stamps an event matrix with Lamport timestamps
//!
//! One worker thread runs per process. Each walks its own row in slot
//! order; sends and internal events are stamped immediately, a receive
//! blocks on the shared condition variable until its send is stamped.

use std::thread;
use std::time::Instant;

use lamport_core::{ClockMatrix, Event, EventLookup, EventMatrix, MatrixError, Position};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, debug_span, info_span, trace, warn};

use crate::{ClockConfig, ClockError, ClockResult, ClockState};

/// Lock-guarded state plus the condition variable receives wait on
struct Shared {
    state: Mutex<ClockState>,
    stamped: Condvar,
}

/// Read-only inputs handed to every worker
struct Worker<'a> {
    process: usize,
    events: &'a [Event],
    lookup: &'a EventLookup,
    shared: &'a Shared,
    config: &'a ClockConfig,
}

/// Clock Computer
#[derive(Clone, Debug, Default)]
pub struct ClockComputer {
    config: ClockConfig,
}

impl ClockComputer {
    /// Create a clock computer with default configuration
    pub fn new() -> Self {
        Self::with_config(ClockConfig::default())
    }

    /// Create a clock computer with custom configuration
    pub fn with_config(config: ClockConfig) -> Self {
        ClockComputer { config }
    }

    /// Stamp every event of `matrix`
    ///
    /// Returns once every worker has finished. NULL slots stay zero.
    pub fn compute(&self, matrix: &EventMatrix) -> ClockResult<ClockMatrix> {
        let span = info_span!("clock_run", rows = matrix.rows(), cols = matrix.cols());
        let _enter = span.enter();

        let lookup = matrix.validate()?;
        let shared = Shared {
            state: Mutex::new(ClockState::new(matrix.rows(), matrix.cols())),
            stamped: Condvar::new(),
        };

        thread::scope(|scope| {
            let handles: Vec<_> = (0..matrix.rows())
                .map(|process| {
                    let worker = Worker {
                        process,
                        events: matrix.row(process),
                        lookup: &lookup,
                        shared: &shared,
                        config: &self.config,
                    };
                    scope.spawn(move || worker.run())
                })
                .collect();

            for (process, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    shared.state.lock().fail(ClockError::WorkerPanicked(process));
                }
            }
        });

        let state = shared.state.into_inner();
        debug!(assigned = state.assigned(), "clock run finished");
        state.into_result()
    }

    /// Parse labels and stamp them
    pub fn compute_labels<I, R, S>(
        &self,
        rows: usize,
        cols: usize,
        labels: I,
    ) -> ClockResult<ClockMatrix>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matrix = EventMatrix::parse(rows, cols, labels)?;
        self.compute(&matrix)
    }
}

impl Worker<'_> {
    fn run(self) {
        let span = debug_span!("process", process = self.process);
        let _enter = span.enter();

        if let Err(error) = self.stamp_all() {
            warn!(%error, "clock run aborted");
            self.shared.state.lock().fail(error);
        }

        self.shared.state.lock().finish_worker();
        self.shared.stamped.notify_all();
    }

    fn stamp_all(&self) -> ClockResult<()> {
        for (slot, event) in self.events.iter().enumerate() {
            let pos = Position::new(self.process, slot);
            match event {
                // Nothing follows a NULL in a valid row
                Event::Null => break,
                Event::Send(_) | Event::Internal(_) => self.stamp_local(pos, event),
                Event::Receive(_) => self.stamp_receive(pos, event)?,
            }
        }
        Ok(())
    }

    fn stamp_local(&self, pos: Position, event: &Event) {
        let mut state = self.shared.state.lock();
        if state.is_failed() {
            return;
        }
        let ts = state.stamp(pos, None, self.config.first_event);
        drop(state);

        debug!(slot = pos.slot, %event, ts = ts.value(), "stamped");
        self.shared.stamped.notify_all();
    }

    fn stamp_receive(&self, pos: Position, event: &Event) -> ClockResult<()> {
        let send_pos = self
            .lookup
            .peer_position(event)
            .ok_or_else(|| MatrixError::UnmatchedReceive(event.clone()))?;
        let deadline = Instant::now() + self.config.receive_timeout;

        let mut state = self.shared.state.lock();
        loop {
            if state.is_failed() {
                return Ok(());
            }

            let send_ts = state.get(send_pos);
            if send_ts.is_set() {
                let ts = state.stamp(pos, Some(send_ts), self.config.first_event);
                drop(state);

                debug!(slot = pos.slot, %event, send = send_ts.value(), ts = ts.value(), "stamped");
                self.shared.stamped.notify_all();
                return Ok(());
            }

            if let Some(waiting) = state.begin_wait(pos, event.clone(), send_pos) {
                if self.config.detect_deadlock {
                    state.end_wait(self.process);
                    return Err(ClockError::Deadlock { waiting });
                }
            }

            trace!(slot = pos.slot, %event, "waiting for send");
            let timed_out = self.shared.stamped.wait_until(&mut state, deadline).timed_out();
            state.end_wait(self.process);

            if timed_out && !state.get(send_pos).is_set() {
                return Err(ClockError::ReceiveTimeout {
                    event: event.clone(),
                    position: pos,
                    timeout: self.config.receive_timeout,
                });
            }
        }
    }
}

/// Stamp `matrix` with the default configuration
pub fn compute(matrix: &EventMatrix) -> ClockResult<ClockMatrix> {
    ClockComputer::new().compute(matrix)
}
