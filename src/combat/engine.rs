//! Resolution of a single invasion trial.
//!
//! Each side's power is `strength * troops`, perturbed by multiplicative normal noise
//! `max(0, 1 + noise * z)`. The side with the higher noisy power takes the field; ties
//! hold for the defender. The loser is wiped out. The winner loses a share of its
//! troops proportional to the loser's noisy power relative to its own.

use serde::Serialize;

use crate::combat::force::InvasionSnapshot;
use crate::combat::rng::TrialRng;
use crate::combat::strength::StrengthTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strengths {
    pub attacker: u64,
    pub defender: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TrialOutcome {
    pub attacker_won: bool,
    pub attacker_casualties: u64,
    pub defender_casualties: u64,
}

pub fn resolve_trial<R: TrialRng + ?Sized>(
    snapshot: &InvasionSnapshot,
    strengths: Strengths,
    tuning: &StrengthTuning,
    rng: &mut R,
) -> TrialOutcome {
    // Draw before any early exit so every trial consumes the same stream length.
    let (z_attacker, z_defender) = rng.standard_normal_pair();

    let attacker_troops = snapshot.attacker.troops;
    let defender_troops = snapshot.defender.troops;
    let attacker_power =
        noisy_power(strengths.attacker, attacker_troops, tuning.noise, z_attacker);
    let defender_power =
        noisy_power(strengths.defender, defender_troops, tuning.noise, z_defender);

    if attacker_power > defender_power {
        TrialOutcome {
            attacker_won: true,
            attacker_casualties: winner_losses(
                attacker_troops,
                defender_power,
                attacker_power,
                tuning.winner_attrition,
            ),
            defender_casualties: defender_troops,
        }
    } else {
        TrialOutcome {
            attacker_won: false,
            attacker_casualties: attacker_troops,
            defender_casualties: winner_losses(
                defender_troops,
                attacker_power,
                defender_power,
                tuning.winner_attrition,
            ),
        }
    }
}

fn noisy_power(strength: u64, troops: u64, noise: f64, z: f64) -> f64 {
    let factor = (1.0 + noise * z).max(0.0);
    strength as f64 * troops as f64 * factor
}

fn winner_losses(troops: u64, loser_power: f64, winner_power: f64, attrition: f64) -> u64 {
    if troops == 0 || winner_power <= 0.0 {
        return 0;
    }
    let share = (attrition * loser_power / winner_power).clamp(0.0, 1.0);
    let losses = (troops as f64 * share).round();
    if losses.is_finite() {
        (losses as u64).min(troops)
    } else {
        0
    }
}
