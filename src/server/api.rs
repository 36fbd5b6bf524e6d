use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::{InputPolicy, InvasionSnapshot, RawSnapshot};
use crate::config::EstimatorConfig;
use crate::error::{EstimateError, InputError};
use crate::estimator::{strength_report, EstimateSummary, InvasionEstimator, StrengthReport};

/// Body of `POST /api/estimate`. The six snapshot values sit under `snapshot`;
/// `input_policy` overrides the configured policy for this request only.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateRequest {
    pub snapshot: RawSnapshot,
    #[serde(default)]
    pub trials: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub input_policy: Option<InputPolicy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub trials: u32,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimateResponse {
    pub status: &'static str,
    pub scenario: ScenarioSummary,
    pub strengths: StrengthReport,
    pub estimate: EstimateSummary,
    pub notes: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrengthResponse {
    pub status: &'static str,
    pub strengths: StrengthReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl From<&InputError> for ValidationErrorResponse {
    fn from(err: &InputError) -> Self {
        Self {
            status: "error",
            message: "Validation failed",
            errors: vec![ValidationIssue {
                field: err.field(),
                messages: vec![err.to_string()],
            }],
        }
    }
}

#[derive(Debug)]
pub enum EstimatePayloadError {
    Parse(serde_json::Error),
    Validation(ValidationErrorResponse),
    Declined(EstimateError),
}

impl fmt::Display for EstimatePayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(_) => write!(f, "invalid estimate request"),
            Self::Declined(err) => write!(f, "unable to compute outcome: {err}"),
        }
    }
}

impl std::error::Error for EstimatePayloadError {}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "beachhead-api",
        "version": env!("CARGO_PKG_VERSION"),
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

fn build_estimator(
    raw: &RawSnapshot,
    policy: InputPolicy,
    config: &EstimatorConfig,
) -> Result<InvasionEstimator, EstimatePayloadError> {
    let snapshot = InvasionSnapshot::from_raw(raw, policy)
        .map_err(|err| EstimatePayloadError::Validation(ValidationErrorResponse::from(&err)))?;
    InvasionEstimator::new(snapshot, config.tuning).map_err(EstimatePayloadError::Declined)
}

pub fn strength_payload(body: &str, config: &EstimatorConfig) -> Result<String, EstimatePayloadError> {
    let raw: RawSnapshot = serde_json::from_str(body).map_err(EstimatePayloadError::Parse)?;
    let estimator = build_estimator(&raw, config.input_policy, config)?;
    let response = StrengthResponse {
        status: "ok",
        strengths: strength_report(&estimator),
    };
    serde_json::to_string_pretty(&response).map_err(EstimatePayloadError::Parse)
}

pub fn estimate_payload(body: &str, config: &EstimatorConfig) -> Result<String, EstimatePayloadError> {
    let req: EstimateRequest = serde_json::from_str(body).map_err(EstimatePayloadError::Parse)?;
    let trials = config.trials_or_default(req.trials);
    let seed = req.seed.unwrap_or(0);
    let policy = req.input_policy.unwrap_or(config.input_policy);
    let estimator = build_estimator(&req.snapshot, policy, config)?;
    let estimate = estimator
        .simulate_parallel(trials, seed, &config.worker_pool())
        .map_err(EstimatePayloadError::Declined)?;

    let response = EstimateResponse {
        status: "ok",
        scenario: ScenarioSummary { trials, seed },
        strengths: strength_report(&estimator),
        estimate: estimate.summary(),
        notes: vec!["Advisory preview only; the server resolves the actual invasion."],
    };
    serde_json::to_string_pretty(&response).map_err(EstimatePayloadError::Parse)
}
