//! Estimator configuration: strength tuning, trial limits and input policy.
//! Read from YAML; a missing file means defaults, a malformed one is an error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::{InputPolicy, StrengthTuning};
use crate::error::ConfigError;
use crate::parallel::WorkerPool;

pub const DEFAULT_CONFIG_PATH: &str = "config/beachhead.yaml";
pub const CONFIG_PATH_ENV: &str = "BEACHHEAD_CONFIG";
pub const DEFAULT_TRIALS: u32 = 1000;
pub const MAX_TRIALS: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub tuning: StrengthTuning,
    pub default_trials: u32,
    pub max_trials: u32,
    pub input_policy: InputPolicy,
    /// Worker threads for parallel estimates; 0 uses every core.
    pub workers: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            tuning: StrengthTuning::default(),
            default_trials: DEFAULT_TRIALS,
            max_trials: MAX_TRIALS,
            input_policy: InputPolicy::default(),
            workers: 0,
        }
    }
}

impl EstimatorConfig {
    /// Requested trial count, or the default when absent, capped at `max_trials`.
    pub fn trials_or_default(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_trials).min(self.max_trials)
    }

    pub fn worker_pool(&self) -> WorkerPool {
        WorkerPool::with_workers(self.workers)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        if self.default_trials > self.max_trials {
            return Err(ConfigError::Tuning(format!(
                "default_trials ({}) exceeds max_trials ({})",
                self.default_trials, self.max_trials
            )));
        }
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<EstimatorConfig, ConfigError> {
    if !Path::new(path).exists() {
        tracing::debug!(path, "no config file, using defaults");
        return Ok(EstimatorConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    let config: EstimatorConfig = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    config.validate()?;
    tracing::info!(path, "loaded estimator config");
    Ok(config)
}

/// Load from `BEACHHEAD_CONFIG` when set, otherwise [DEFAULT_CONFIG_PATH].
pub fn load_config_from_env() -> Result<EstimatorConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(&path)
}
