//! Per-trial CSV trace of an estimate, for checking the distribution behind a preview.
//!
//! Columns: `trial,attacker_won,attacker_casualties,defender_casualties`.
//! The trials are drawn exactly as [InvasionEstimator::simulate_seeded] draws them,
//! so the returned totals match a seeded estimate with the same inputs.

use std::io::Write;

use serde::Serialize;

use crate::combat::Rng;
use crate::error::EstimateError;
use crate::estimator::{Estimate, InvasionEstimator};
use crate::parallel::batch_ranges;

const EXPORT_PROGRESS_BATCHES: usize = 10;

#[derive(Debug, Serialize)]
struct TrialRow {
    trial: u32,
    attacker_won: bool,
    attacker_casualties: u64,
    defender_casualties: u64,
}

pub fn export_trials_csv<W: Write>(
    estimator: &InvasionEstimator,
    trials: u32,
    seed: u64,
    writer: W,
) -> Result<Estimate, EstimateError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rng = Rng::new(seed);
    let mut estimate = Estimate::default();

    for (start, end) in batch_ranges(trials as usize, EXPORT_PROGRESS_BATCHES) {
        for trial in start..end {
            let outcome = estimator.run_trial(&mut rng);
            csv_writer.serialize(TrialRow {
                trial: trial as u32,
                attacker_won: outcome.attacker_won,
                attacker_casualties: outcome.attacker_casualties,
                defender_casualties: outcome.defender_casualties,
            })?;
            estimate.record(outcome);
        }
        tracing::trace!(written = end, total = trials, "trial export progress");
    }
    if trials == 0 {
        csv_writer.write_record([
            "trial",
            "attacker_won",
            "attacker_casualties",
            "defender_casualties",
        ])?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    tracing::debug!(trials, seed, "exported trial trace");
    Ok(estimate)
}
