//! Snapshots of the two sides of a ground invasion.
//!
//! The game-state layer owns fleets and star systems; the estimator only ever sees
//! a copy taken at dialog time. [RawSnapshot] is that copy as handed over (signed,
//! untrusted), [InvasionSnapshot] is the validated form every other module works on.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub const MAX_MORALE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackingForce {
    pub troops: u64,
    pub weapons_tech: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefendingPosition {
    pub troops: u64,
    pub weapons_tech: u32,
    /// 0..=100.
    pub morale: u8,
    pub bunkers: u32,
}

/// How negative or out-of-range snapshot values are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    #[default]
    Reject,
    Clamp,
}

/// Every field is required and unknown keys are refused, so a typo can never
/// turn into a silent zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSnapshot {
    pub attacker_troops: i64,
    pub attacker_weapons_tech: i64,
    pub defender_troops: i64,
    pub defender_weapons_tech: i64,
    pub defender_morale: i64,
    pub defender_bunkers: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvasionSnapshot {
    pub attacker: AttackingForce,
    pub defender: DefendingPosition,
}

impl InvasionSnapshot {
    pub fn new(attacker: AttackingForce, defender: DefendingPosition) -> Self {
        Self {
            attacker,
            defender: DefendingPosition {
                morale: defender.morale.min(MAX_MORALE),
                ..defender
            },
        }
    }

    pub fn from_raw(raw: &RawSnapshot, policy: InputPolicy) -> Result<Self, InputError> {
        let attacker = AttackingForce {
            troops: convert(raw.attacker_troops, "attacker_troops", policy)?,
            weapons_tech: convert(raw.attacker_weapons_tech, "attacker_weapons_tech", policy)?,
        };
        let morale = match policy {
            InputPolicy::Reject if raw.defender_morale < 0 => {
                return Err(InputError::Negative {
                    field: "defender_morale",
                    value: raw.defender_morale,
                })
            }
            InputPolicy::Reject if raw.defender_morale > i64::from(MAX_MORALE) => {
                return Err(InputError::MoraleOutOfRange(raw.defender_morale))
            }
            _ => raw.defender_morale.clamp(0, i64::from(MAX_MORALE)) as u8,
        };
        let defender = DefendingPosition {
            troops: convert(raw.defender_troops, "defender_troops", policy)?,
            weapons_tech: convert(raw.defender_weapons_tech, "defender_weapons_tech", policy)?,
            morale,
            bunkers: convert(raw.defender_bunkers, "defender_bunkers", policy)?,
        };
        Ok(Self { attacker, defender })
    }
}

fn convert<T>(value: i64, field: &'static str, policy: InputPolicy) -> Result<T, InputError>
where
    T: TryFrom<i64> + Bounded,
{
    if value < 0 {
        return match policy {
            InputPolicy::Reject => Err(InputError::Negative { field, value }),
            InputPolicy::Clamp => {
                tracing::warn!(field, value, "clamping negative snapshot value to zero");
                Ok(T::ZERO)
            }
        };
    }
    match T::try_from(value) {
        Ok(converted) => Ok(converted),
        Err(_) => match policy {
            InputPolicy::Reject => Err(InputError::Overflow { field, value }),
            InputPolicy::Clamp => Ok(T::MAX),
        },
    }
}

/// Unsigned targets of snapshot conversion.
trait Bounded {
    const ZERO: Self;
    const MAX: Self;
}

impl Bounded for u32 {
    const ZERO: Self = 0;
    const MAX: Self = u32::MAX;
}

impl Bounded for u64 {
    const ZERO: Self = 0;
    const MAX: Self = u64::MAX;
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
            defender_bunkers: 2,
        }
    }

    #[test]
    fn valid_raw_snapshot_converts_field_by_field() {
        let snapshot = InvasionSnapshot::from_raw(&raw(), InputPolicy::Reject).unwrap();
        assert_eq!(snapshot.attacker, AttackingForce { troops: 1000, weapons_tech: 3 });
        assert_eq!(
            snapshot.defender,
            DefendingPosition { troops: 500, weapons_tech: 1, morale: 50, bunkers: 2 }
        );
    }

    #[test]
    fn reject_policy_names_the_negative_field() {
        let bad = RawSnapshot { defender_bunkers: -4, ..raw() };
        let err = InvasionSnapshot::from_raw(&bad, InputPolicy::Reject).unwrap_err();
        assert_eq!(err, InputError::Negative { field: "defender_bunkers", value: -4 });
        assert_eq!(err.field(), "defender_bunkers");
    }

    #[test]
    fn reject_policy_refuses_morale_above_hundred() {
        let bad = RawSnapshot { defender_morale: 140, ..raw() };
        let err = InvasionSnapshot::from_raw(&bad, InputPolicy::Reject).unwrap_err();
        assert_eq!(err, InputError::MoraleOutOfRange(140));
    }

    #[test]
    fn reject_policy_refuses_tech_beyond_u32() {
        let bad = RawSnapshot { attacker_weapons_tech: i64::from(u32::MAX) + 1, ..raw() };
        let err = InvasionSnapshot::from_raw(&bad, InputPolicy::Reject).unwrap_err();
        assert_eq!(err.field(), "attacker_weapons_tech");
    }

    #[test]
    fn clamp_policy_zeroes_negatives_and_caps_morale() {
        let bad = RawSnapshot {
            attacker_troops: -10,
            defender_weapons_tech: -1,
            defender_morale: 250,
            ..raw()
        };
        let snapshot = InvasionSnapshot::from_raw(&bad, InputPolicy::Clamp).unwrap();
        assert_eq!(snapshot.attacker.troops, 0);
        assert_eq!(snapshot.defender.weapons_tech, 0);
        assert_eq!(snapshot.defender.morale, 100);
    }

    #[test]
    fn new_caps_morale() {
        let snapshot = InvasionSnapshot::new(
            AttackingForce::default(),
            DefendingPosition { morale: 200, ..DefendingPosition::default() },
        );
        assert_eq!(snapshot.defender.morale, MAX_MORALE);
    }

    #[test]
    fn missing_json_field_is_a_parse_error() {
        let err = serde_json::from_str::<RawSnapshot>(
            r#"{"attacker_troops":5,"attacker_weapons_tech":1,"defender_troops":5,"defender_weapons_tech":1,"defender_bunkers":0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("defender_morale"));
    }

    #[test]
    fn misspelled_json_field_is_a_parse_error() {
        let err = serde_json::from_str::<RawSnapshot>(
            r#"{"attacker_troop":5,"attacker_weapons_tech":1,"defender_troops":5,"defender_weapons_tech":1,"defender_morale":50,"defender_bunkers":0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("attacker_troop"));
    }
}
