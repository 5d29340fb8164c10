//! Lamport Clocks Demo
//!
//! Runs one labelled 3x4 matrix through the clock computer and three
//! timestamp matrices through the reconstructor, printing each result
//! row by row (or `INCORRECT`).
//!
//! `RUST_LOG` controls log output; `LAMPORT_RECEIVE_TIMEOUT_MS` overrides
//! how long a receive may wait for its send.

use std::time::Duration;

use lamport_core::ClockMatrix;
use lamport_time::{ClockComputer, ClockConfig};
use lamport_verify::Reconstructor;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClockConfig::default();
    if let Ok(ms) = std::env::var("LAMPORT_RECEIVE_TIMEOUT_MS") {
        config = config.with_receive_timeout(Duration::from_millis(ms.parse()?));
    }
    tracing::info!(?config, "starting demo");

    // Case 1: labelled events to clocks
    let computer = ClockComputer::with_config(config);
    let clocks = computer.compute_labels(
        3,
        4,
        &[
            ["a", "s1", "r3", "b"],
            ["c", "r2", "s3", "NULL"],
            ["r1", "d", "s2", "e"],
        ],
    )?;
    println!("{}", clocks);

    // Cases 2-4: clocks back to events
    let cases: [[[u64; 4]; 3]; 3] = [
        [[1, 2, 8, 9], [1, 6, 7, 0], [3, 4, 5, 6]],
        [[1, 2, 8, 9], [1, 6, 7, 0], [2, 3, 4, 5]],
        [[1, 2, 8, 9], [1, 6, 7, 0], [2, 4, 5, 6]],
    ];
    let reconstructor = Reconstructor::new();
    for (i, values) in cases.iter().enumerate() {
        println!();
        let clocks = ClockMatrix::from_values(3, 4, values)?;
        match reconstructor.reconstruct(&clocks) {
            Ok(events) => println!("{}", events),
            Err(rejection) => {
                tracing::debug!(%rejection, "case {} rejected", i + 2);
                println!("{}", rejection.token());
            }
        }
    }

    Ok(())
}
