//! Monte-Carlo estimate of a ground invasion.
//!
//! [InvasionEstimator] is built once from a validated snapshot, caches both strength
//! figures, and can then run any number of independent estimates. It never mutates
//! the snapshot, so one estimator can be shared across threads.

pub mod export_csv;
pub mod preview;

use rayon::prelude::*;
use serde::Serialize;

use crate::combat::{
    attacker_strength, defender_strength, resolve_trial, InvasionSnapshot, Rng, Side,
    StrengthTuning, Strengths, TrialOutcome, TrialRng,
};
use crate::error::EstimateError;
use crate::parallel::{chunk_ranges, WorkerPool};

pub use export_csv::export_trials_csv;
pub use preview::{preview_invasion, strength_report, InvasionPreview, StrengthReport};

/// Trials per independently seeded chunk in [InvasionEstimator::simulate_parallel].
pub const TRIALS_PER_CHUNK: usize = 4096;

#[derive(Debug, Clone)]
pub struct InvasionEstimator {
    snapshot: InvasionSnapshot,
    tuning: StrengthTuning,
    strengths: Strengths,
}

impl InvasionEstimator {
    pub fn new(snapshot: InvasionSnapshot, tuning: StrengthTuning) -> Result<Self, EstimateError> {
        tuning.validate()?;
        let strengths = Strengths {
            attacker: attacker_strength(&snapshot.attacker, &tuning),
            defender: defender_strength(&snapshot.defender, &tuning),
        };
        Ok(Self {
            snapshot,
            tuning,
            strengths,
        })
    }

    pub fn strength(&self, side: Side) -> u64 {
        match side {
            Side::Attacker => self.strengths.attacker,
            Side::Defender => self.strengths.defender,
        }
    }

    pub fn strengths(&self) -> Strengths {
        self.strengths
    }

    /// Resolve one trial with the given random source.
    pub fn run_trial<R: TrialRng + ?Sized>(&self, rng: &mut R) -> TrialOutcome {
        resolve_trial(&self.snapshot, self.strengths, &self.tuning, rng)
    }

    /// Run `trials` independent trials drawing from `rng`.
    pub fn simulate<R: TrialRng + ?Sized>(&self, trials: u32, rng: &mut R) -> Estimate {
        let mut estimate = Estimate::default();
        for _ in 0..trials {
            estimate.record(self.run_trial(rng));
        }
        tracing::debug!(
            trials,
            attacker_wins = estimate.attacker_win_count,
            attacker_strength = self.strengths.attacker,
            defender_strength = self.strengths.defender,
            "invasion estimate complete"
        );
        estimate
    }

    pub fn simulate_seeded(&self, trials: u32, seed: u64) -> Estimate {
        self.simulate(trials, &mut Rng::new(seed))
    }

    /// Like [InvasionEstimator::simulate_seeded] but spreads fixed-size chunks across
    /// Rayon workers. Each chunk gets its own stream derived from `seed` and its index,
    /// so the result depends on `seed` alone, not on the worker count.
    pub fn simulate_parallel(
        &self,
        trials: u32,
        seed: u64,
        pool: &WorkerPool,
    ) -> Result<Estimate, EstimateError> {
        let chunks = chunk_ranges(trials as usize, TRIALS_PER_CHUNK);
        pool.install(|| {
            chunks
                .par_iter()
                .enumerate()
                .map(|(index, &(start, end))| {
                    let mut rng = Rng::new(Rng::stream_seed(seed, index as u64));
                    // Chunk lengths never exceed TRIALS_PER_CHUNK.
                    self.simulate((end - start) as u32, &mut rng)
                })
                .reduce(Estimate::default, Estimate::merge)
        })
    }
}

/// Totals over a run of trials. Casualties are summed across trials; divide by
/// `trials` (or use the `avg_*` helpers) for the per-battle expectation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub trials: u32,
    pub attacker_win_count: u32,
    pub attacker_casualties: u64,
    pub defender_casualties: u64,
}

impl Estimate {
    pub fn record(&mut self, outcome: TrialOutcome) {
        self.trials += 1;
        if outcome.attacker_won {
            self.attacker_win_count += 1;
        }
        self.attacker_casualties = self
            .attacker_casualties
            .saturating_add(outcome.attacker_casualties);
        self.defender_casualties = self
            .defender_casualties
            .saturating_add(outcome.defender_casualties);
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            trials: self.trials.saturating_add(other.trials),
            attacker_win_count: self.attacker_win_count.saturating_add(other.attacker_win_count),
            attacker_casualties: self.attacker_casualties.saturating_add(other.attacker_casualties),
            defender_casualties: self.defender_casualties.saturating_add(other.defender_casualties),
        }
    }

    pub fn win_rate(&self) -> f64 {
        ratio(u64::from(self.attacker_win_count), self.trials)
    }

    /// Win rate as the whole percent shown to the player.
    pub fn win_percentage(&self) -> u32 {
        (self.win_rate() * 100.0).round() as u32
    }

    pub fn avg_attacker_casualties(&self) -> f64 {
        ratio(self.attacker_casualties, self.trials)
    }

    pub fn avg_defender_casualties(&self) -> f64 {
        ratio(self.defender_casualties, self.trials)
    }

    /// Normal-approximation 95% interval for the attacker win rate.
    pub fn win_rate_95_ci(&self) -> [f64; 2] {
        if self.trials == 0 {
            return [0.0, 0.0];
        }
        let p = self.win_rate();
        let z = 1.96;
        let se = (p * (1.0 - p) / f64::from(self.trials)).sqrt();
        [(p - z * se).max(0.0), (p + z * se).min(1.0)]
    }

    pub fn summary(&self) -> EstimateSummary {
        EstimateSummary {
            trials: self.trials,
            attacker_win_count: self.attacker_win_count,
            attacker_casualties: self.attacker_casualties,
            defender_casualties: self.defender_casualties,
            win_rate: self.win_rate(),
            win_percentage: self.win_percentage(),
            avg_attacker_casualties: self.avg_attacker_casualties(),
            avg_defender_casualties: self.avg_defender_casualties(),
            win_rate_95_ci: self.win_rate_95_ci(),
        }
    }
}

fn ratio(total: u64, trials: u32) -> f64 {
    if trials == 0 {
        0.0
    } else {
        total as f64 / f64::from(trials)
    }
}

/// Serializable view of an [Estimate] with derived rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateSummary {
    pub trials: u32,
    pub attacker_win_count: u32,
    pub attacker_casualties: u64,
    pub defender_casualties: u64,
    pub win_rate: f64,
    pub win_percentage: u32,
    pub avg_attacker_casualties: f64,
    pub avg_defender_casualties: f64,
    pub win_rate_95_ci: [f64; 2],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{AttackingForce, DefendingPosition};

    fn estimator(attacker_troops: u64, defender_troops: u64) -> InvasionEstimator {
        InvasionEstimator::new(
            InvasionSnapshot::new(
                AttackingForce { troops: attacker_troops, weapons_tech: 2 },
                DefendingPosition { troops: defender_troops, weapons_tech: 2, morale: 100, bunkers: 0 },
            ),
            StrengthTuning::default(),
        )
        .unwrap()
    }

    #[test]
    fn zero_trials_yield_zeroed_estimate() {
        let estimate = estimator(10, 10).simulate_seeded(0, 1);
        assert_eq!(estimate, Estimate::default());
        assert_eq!(estimate.win_rate(), 0.0);
        assert_eq!(estimate.avg_attacker_casualties(), 0.0);
        assert_eq!(estimate.win_rate_95_ci(), [0.0, 0.0]);
    }

    #[test]
    fn seeded_runs_repeat_exactly() {
        let est = estimator(500, 450);
        assert_eq!(est.simulate_seeded(2000, 42), est.simulate_seeded(2000, 42));
    }

    #[test]
    fn parallel_result_is_independent_of_worker_count() {
        let est = estimator(500, 450);
        let one = est.simulate_parallel(10_000, 9, &WorkerPool::with_workers(1)).unwrap();
        let four = est.simulate_parallel(10_000, 9, &WorkerPool::with_workers(4)).unwrap();
        assert_eq!(one, four);
        assert_eq!(one.trials, 10_000);
    }

    #[test]
    fn merge_adds_every_counter() {
        let a = Estimate { trials: 3, attacker_win_count: 1, attacker_casualties: 10, defender_casualties: 4 };
        let b = Estimate { trials: 2, attacker_win_count: 2, attacker_casualties: 1, defender_casualties: 6 };
        assert_eq!(
            a.merge(b),
            Estimate { trials: 5, attacker_win_count: 3, attacker_casualties: 11, defender_casualties: 10 }
        );
    }

    #[test]
    fn win_percentage_rounds_like_the_dialog() {
        let estimate = Estimate { trials: 1000, attacker_win_count: 736, ..Estimate::default() };
        assert_eq!(estimate.win_percentage(), 74);
        let ci = estimate.win_rate_95_ci();
        assert!(ci[0] < 0.736 && 0.736 < ci[1]);
    }

    #[test]
    fn invalid_tuning_is_rejected_at_construction() {
        let snapshot = InvasionSnapshot::new(AttackingForce::default(), DefendingPosition::default());
        let tuning = StrengthTuning { noise: -1.0, ..StrengthTuning::default() };
        assert!(matches!(
            InvasionEstimator::new(snapshot, tuning),
            Err(EstimateError::Config(_))
        ));
    }
}
