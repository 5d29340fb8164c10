//! Execution Generator - random but valid event matrices
//!
//! Events are produced by simulating the processes one step at a time,
//! so every receive consumes a message that was already sent. Messages
//! still in flight when the run ends are turned into internal events,
//! keeping the send/receive pairing one-to-one.

use lamport_core::{Event, EventMatrix, MatrixResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Generator configuration
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Number of processes (rows)
    pub processes: usize,
    /// Number of slots per process (columns)
    pub slots: usize,
    /// Probability that a step sends a message
    pub send_prob: f64,
    /// Probability that a step receives, when a message is waiting
    pub receive_prob: f64,
    /// Probability that a process stops early
    pub early_stop_prob: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            processes: 3,
            slots: 4,
            send_prob: 0.3,
            receive_prob: 0.5,
            early_stop_prob: 0.2,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Wide run with heavy messaging
    pub fn chatty() -> Self {
        GeneratorConfig {
            processes: 6,
            slots: 12,
            send_prob: 0.5,
            receive_prob: 0.8,
            early_stop_prob: 0.1,
            seed: 42,
        }
    }

    /// Large run for benchmarks
    pub fn large() -> Self {
        GeneratorConfig {
            processes: 16,
            slots: 64,
            send_prob: 0.3,
            receive_prob: 0.6,
            early_stop_prob: 0.05,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_shape(mut self, processes: usize, slots: usize) -> Self {
        self.processes = processes;
        self.slots = slots;
        self
    }
}

/// Random execution generator
pub struct ExecutionGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl ExecutionGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        ExecutionGenerator { config, rng }
    }

    /// Produce the next random execution
    pub fn generate(&mut self) -> MatrixResult<EventMatrix> {
        let processes = self.config.processes;
        let slots = self.config.slots;

        let lengths: Vec<usize> = (0..processes)
            .map(|_| {
                if slots > 0 && self.rng.gen_bool(self.config.early_stop_prob) {
                    self.rng.gen_range(0..slots)
                } else {
                    slots
                }
            })
            .collect();

        let mut timelines: Vec<Vec<Event>> =
            lengths.iter().map(|&len| Vec::with_capacity(len)).collect();
        // In-flight messages as (seq, sender)
        let mut in_flight: Vec<(u64, usize)> = Vec::new();
        let mut next_seq = 1u64;
        let mut next_internal = 1usize;

        loop {
            let open: Vec<usize> = (0..processes)
                .filter(|&p| timelines[p].len() < lengths[p])
                .collect();
            let Some(&process) = open.choose(&mut self.rng) else {
                break;
            };

            let inbox: Vec<usize> = in_flight
                .iter()
                .enumerate()
                .filter(|(_, (_, sender))| *sender != process)
                .map(|(i, _)| i)
                .collect();

            let event = if !inbox.is_empty() && self.rng.gen_bool(self.config.receive_prob) {
                let pick = inbox[self.rng.gen_range(0..inbox.len())];
                let (seq, _) = in_flight.swap_remove(pick);
                Event::Receive(seq)
            } else if processes > 1 && self.rng.gen_bool(self.config.send_prob) {
                let seq = next_seq;
                next_seq += 1;
                in_flight.push((seq, process));
                Event::Send(seq)
            } else {
                next_internal += 1;
                Event::Internal(format!("i{}", next_internal - 1))
            };

            timelines[process].push(event);
        }

        // Undelivered sends become local events
        for (seq, sender) in in_flight {
            if let Some(slot) = timelines[sender].iter_mut().find(|e| **e == Event::Send(seq)) {
                *slot = Event::Internal(format!("i{}", next_internal));
                next_internal += 1;
            }
        }

        for timeline in &mut timelines {
            timeline.resize(slots, Event::Null);
        }

        EventMatrix::from_rows(processes, slots, timelines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_matrices_are_valid() {
        let mut generator = ExecutionGenerator::new(GeneratorConfig::chatty());
        for _ in 0..50 {
            let matrix = generator.generate().unwrap();
            assert_eq!(matrix.rows(), 6);
            assert_eq!(matrix.cols(), 12);
            matrix.validate().unwrap();
        }
    }

    #[test]
    fn test_same_seed_same_execution() {
        let a = ExecutionGenerator::new(GeneratorConfig::default().with_seed(7))
            .generate()
            .unwrap();
        let b = ExecutionGenerator::new(GeneratorConfig::default().with_seed(7))
            .generate()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_process_has_no_messages() {
        let mut generator = ExecutionGenerator::new(GeneratorConfig::chatty().with_shape(1, 8));
        let matrix = generator.generate().unwrap();
        assert!(matrix.row(0).iter().all(|e| e.is_internal() || e.is_null()));
    }
}
