pub mod engine;
pub mod force;
pub mod rng;
pub mod strength;

pub use engine::{resolve_trial, Strengths, TrialOutcome};
pub use force::{
    AttackingForce, DefendingPosition, InputPolicy, InvasionSnapshot, RawSnapshot, Side,
    MAX_MORALE,
};
pub use rng::{Rng, TrialRng};
pub use strength::{attacker_strength, defender_strength, StrengthTuning};
