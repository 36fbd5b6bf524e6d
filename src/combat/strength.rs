//! Deterministic strength figures for each side of an invasion.
//!
//! Attacker: `base + bonus * weapons_tech`.
//! Defender: the same tech curve scaled by morale, plus a flat bonus per bunker.
//! Morale scales linearly from `morale_floor_percent` (morale 0) to 100% (morale 100).

use serde::{Deserialize, Serialize};

use crate::combat::force::{AttackingForce, DefendingPosition, MAX_MORALE};
use crate::error::ConfigError;

pub const DEFAULT_BASE_STRENGTH: u64 = 10;
pub const DEFAULT_WEAPONS_TECH_BONUS: u64 = 2;
pub const DEFAULT_MORALE_FLOOR_PERCENT: u64 = 50;
pub const DEFAULT_BUNKER_STRENGTH: u64 = 3;
pub const DEFAULT_NOISE: f64 = 0.25;
pub const DEFAULT_WINNER_ATTRITION: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthTuning {
    pub base_strength: u64,
    pub weapons_tech_bonus: u64,
    pub morale_floor_percent: u64,
    pub bunker_strength: u64,
    /// Standard deviation of the multiplicative noise applied to each side's power per trial.
    pub noise: f64,
    /// Scales the winner's losses relative to the loser's share of total power.
    pub winner_attrition: f64,
}

impl Default for StrengthTuning {
    fn default() -> Self {
        Self {
            base_strength: DEFAULT_BASE_STRENGTH,
            weapons_tech_bonus: DEFAULT_WEAPONS_TECH_BONUS,
            morale_floor_percent: DEFAULT_MORALE_FLOOR_PERCENT,
            bunker_strength: DEFAULT_BUNKER_STRENGTH,
            noise: DEFAULT_NOISE,
            winner_attrition: DEFAULT_WINNER_ATTRITION,
        }
    }
}

impl StrengthTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(ConfigError::Tuning(format!(
                "noise must be a non-negative number (got {})",
                self.noise
            )));
        }
        if !self.winner_attrition.is_finite() || self.winner_attrition < 0.0 {
            return Err(ConfigError::Tuning(format!(
                "winner_attrition must be a non-negative number (got {})",
                self.winner_attrition
            )));
        }
        if self.morale_floor_percent > 100 {
            return Err(ConfigError::Tuning(format!(
                "morale_floor_percent must be within 0..=100 (got {})",
                self.morale_floor_percent
            )));
        }
        Ok(())
    }

    fn tech_strength(&self, weapons_tech: u32) -> u64 {
        self.base_strength
            .saturating_add(self.weapons_tech_bonus.saturating_mul(u64::from(weapons_tech)))
    }

    /// Percentage (0..=100) of tech strength a defender fields at the given morale.
    pub fn morale_factor_percent(&self, morale: u8) -> u64 {
        let floor = self.morale_floor_percent.min(100);
        let morale = u64::from(morale.min(MAX_MORALE));
        floor + (100 - floor) * morale / 100
    }
}

pub fn attacker_strength(force: &AttackingForce, tuning: &StrengthTuning) -> u64 {
    tuning.tech_strength(force.weapons_tech)
}

pub fn defender_strength(position: &DefendingPosition, tuning: &StrengthTuning) -> u64 {
    let tech = tuning.tech_strength(position.weapons_tech);
    let morale_scaled = tech.saturating_mul(tuning.morale_factor_percent(position.morale)) / 100;
    morale_scaled.saturating_add(tuning.bunker_strength.saturating_mul(u64::from(position.bunkers)))
}
