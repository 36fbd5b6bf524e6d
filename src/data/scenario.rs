//! Named invasion scenarios stored as JSON (`.json`) or YAML (anything else).
//!
//! ```yaml
//! scenarios:
//!   - name: border-world
//!     snapshot:
//!       attacker_troops: 1000
//!       attacker_weapons_tech: 3
//!       defender_troops: 500
//!       defender_weapons_tech: 1
//!       defender_morale: 50
//!       defender_bunkers: 0
//!     trials: 1000
//!     seed: 7
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::RawSnapshot;
use crate::error::ScenarioError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    pub snapshot: RawSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trials: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

pub fn load_scenarios(path: &str) -> Result<ScenarioFile, ScenarioError> {
    let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
        path: path.to_string(),
        source,
    })?;
    parse_scenarios(path, &raw)
}

/// Parse scenario text; the format is picked from the extension of `path`.
pub fn parse_scenarios(path: &str, raw: &str) -> Result<ScenarioFile, ScenarioError> {
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(raw).map_err(|source| ScenarioError::Json {
            path: path.to_string(),
            source,
        })
    } else {
        serde_yaml::from_str(raw).map_err(|source| ScenarioError::Yaml {
            path: path.to_string(),
            source,
        })
    }
}

pub fn find_scenario<'a>(file: &'a ScenarioFile, name: &str) -> Result<&'a Scenario, ScenarioError> {
    let wanted = name.trim();
    file.scenarios
        .iter()
        .find(|scenario| scenario.name.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ScenarioError::NotFound(wanted.to_string()))
}
