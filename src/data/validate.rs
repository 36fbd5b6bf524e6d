use std::collections::HashSet;
use std::fmt;

use crate::combat::{InputPolicy, InvasionSnapshot};
use crate::data::scenario::{load_scenarios, ScenarioFile};
use crate::error::ScenarioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_scenario_file(
    path: &str,
    policy: InputPolicy,
    max_trials: u32,
) -> Result<ValidationReport, ScenarioError> {
    let file = load_scenarios(path)?;
    Ok(validate_scenarios(&file, policy, max_trials))
}

pub fn validate_scenarios(
    file: &ScenarioFile,
    policy: InputPolicy,
    max_trials: u32,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    if file.scenarios.is_empty() {
        report.push(ValidationSeverity::Warning, "scenarios", "no scenarios defined");
    }

    let mut seen_names = HashSet::new();
    for (index, scenario) in file.scenarios.iter().enumerate() {
        let context = format!("scenarios[{index}]");
        let name = scenario.name.trim();
        if name.is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "missing non-empty 'name'",
            );
        } else if !seen_names.insert(name.to_ascii_lowercase()) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                format!("duplicate name '{name}'"),
            );
        }

        match InvasionSnapshot::from_raw(&scenario.snapshot, policy) {
            Ok(snapshot) => {
                if snapshot.attacker.troops == 0 {
                    report.push(
                        ValidationSeverity::Info,
                        format!("{context}.snapshot.attacker_troops"),
                        "attacker has no troops; every trial is a defender hold",
                    );
                }
                if snapshot.defender.troops == 0 {
                    report.push(
                        ValidationSeverity::Info,
                        format!("{context}.snapshot.defender_troops"),
                        "defender has no troops",
                    );
                }
            }
            Err(err) => report.push(
                ValidationSeverity::Error,
                format!("{context}.snapshot.{}", err.field()),
                err.to_string(),
            ),
        }

        match scenario.trials {
            Some(0) => report.push(
                ValidationSeverity::Warning,
                format!("{context}.trials"),
                "trials is 0; the estimate will be empty",
            ),
            Some(trials) if trials > max_trials => report.push(
                ValidationSeverity::Warning,
                format!("{context}.trials"),
                format!("trials {trials} exceeds max_trials {max_trials} and will be capped"),
            ),
            _ => {}
        }
    }

    report
}
