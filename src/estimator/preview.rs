//! The advisory outcome preview shown before an invasion order is sent.
//! A preview that cannot be computed is an error, never a defaulted number.

use serde::Serialize;

use crate::combat::{InputPolicy, InvasionSnapshot, RawSnapshot, Side, StrengthTuning};
use crate::error::EstimateError;
use crate::estimator::{EstimateSummary, InvasionEstimator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthReport {
    pub attacker: u64,
    pub defender: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvasionPreview {
    pub seed: u64,
    pub strengths: StrengthReport,
    pub estimate: EstimateSummary,
}

pub fn strength_report(estimator: &InvasionEstimator) -> StrengthReport {
    StrengthReport {
        attacker: estimator.strength(Side::Attacker),
        defender: estimator.strength(Side::Defender),
    }
}

pub fn preview_invasion(
    raw: &RawSnapshot,
    policy: InputPolicy,
    tuning: StrengthTuning,
    trials: u32,
    seed: u64,
) -> Result<InvasionPreview, EstimateError> {
    let snapshot = InvasionSnapshot::from_raw(raw, policy)?;
    let estimator = InvasionEstimator::new(snapshot, tuning)?;
    let estimate = estimator.simulate_seeded(trials, seed);
    Ok(InvasionPreview {
        seed,
        strengths: strength_report(&estimator),
        estimate: estimate.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawSnapshot {
        RawSnapshot {
            attacker_troops: 1000,
            attacker_weapons_tech: 3,
            defender_troops: 500,
            defender_weapons_tech: 1,
            defender_morale: 50,
            defender_bunkers: 0,
        }
    }

    #[test]
    fn preview_reports_strengths_and_estimate() {
        let preview =
            preview_invasion(&raw(), InputPolicy::Reject, StrengthTuning::default(), 500, 3).unwrap();
        assert_eq!(preview.strengths, StrengthReport { attacker: 16, defender: 9 });
        assert_eq!(preview.estimate.trials, 500);
    }

    #[test]
    fn negative_input_declines_the_preview() {
        let bad = RawSnapshot { attacker_troops: -1, ..raw() };
        let result = preview_invasion(&bad, InputPolicy::Reject, StrengthTuning::default(), 500, 3);
        assert!(matches!(result, Err(EstimateError::Input(_))));
    }
}
