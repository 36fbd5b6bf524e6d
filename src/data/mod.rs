pub mod scenario;
pub mod validate;

pub use scenario::{find_scenario, load_scenarios, parse_scenarios, Scenario, ScenarioFile};
pub use validate::{
    validate_scenario_file, validate_scenarios, ValidationDiagnostic, ValidationReport,
    ValidationSeverity,
};
