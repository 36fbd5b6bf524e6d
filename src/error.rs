//! Error types for the invasion estimator.

use thiserror::Error;

/// Rejected snapshot field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("defender_morale must be within 0..=100 (got {0})")]
    MoraleOutOfRange(i64),

    #[error("{field} is too large (got {value})")]
    Overflow { field: &'static str, value: i64 },
}

impl InputError {
    /// Name of the snapshot field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Negative { field, .. } | Self::Overflow { field, .. } => field,
            Self::MoraleOutOfRange(_) => "defender_morale",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid tuning: {0}")]
    Tuning(String),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("unable to read scenario file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse json '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to parse yaml '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("scenario '{0}' not found")]
    NotFound(String),
}

/// Top-level error: any reason an outcome estimate is declined.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("unable to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("unable to write trial export: {0}")]
    Export(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, EstimateError>;
