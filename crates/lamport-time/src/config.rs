//! Clock computer configuration

use std::time::Duration;

/// How the first event of a process is stamped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FirstEventRule {
    /// Standard Lamport: slot 0 has no predecessor, so a send or
    /// internal event there gets 1 and a receive gets `send + 1`
    #[default]
    PerProcess,
    /// Keyed off the run-wide assignment counter: only the very first
    /// event of the whole run takes a literal 1; every other slot-0
    /// event reads the last slot of its own process as predecessor.
    /// That slot is still unwritten when read, so results match
    /// `PerProcess`.
    GlobalCounter,
}

/// Clock computer configuration
#[derive(Clone, Debug)]
pub struct ClockConfig {
    /// Longest a receive may wait for its send
    pub receive_timeout: Duration,
    /// Abort as soon as every running worker is blocked on a receive
    pub detect_deadlock: bool,
    /// First-event stamping rule
    pub first_event: FirstEventRule,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            receive_timeout: Duration::from_secs(10),
            detect_deadlock: true,
            first_event: FirstEventRule::PerProcess,
        }
    }
}

impl ClockConfig {
    /// Short waits, for tests and interactive use
    pub fn strict() -> Self {
        ClockConfig {
            receive_timeout: Duration::from_millis(500),
            ..Self::default()
        }
    }

    /// Run-wide first-event rule
    pub fn global_counter() -> Self {
        ClockConfig {
            first_event: FirstEventRule::GlobalCounter,
            ..Self::default()
        }
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    pub fn with_first_event(mut self, rule: FirstEventRule) -> Self {
        self.first_event = rule;
        self
    }

    pub fn with_deadlock_detection(mut self, enabled: bool) -> Self {
        self.detect_deadlock = enabled;
        self
    }
}
