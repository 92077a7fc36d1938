//! Runtime configuration for request validation and logging

use serde::{Deserialize, Serialize};
use std::env;

/// Request-level rules applied before reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Minimum number of balances a request must carry
    pub min_checkpoints: usize,
    /// Accept requests without any movement
    pub allow_empty_movements: bool,
    /// Filter directive for binaries that install a subscriber
    pub log_level: String,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            min_checkpoints: 2,
            allow_empty_movements: false,
            log_level: "info".to_string(),
        }
    }
}

impl ReconciliationConfig {
    pub const MIN_CHECKPOINTS_VAR: &'static str = "RECONCILIATION_MIN_CHECKPOINTS";
    pub const ALLOW_EMPTY_MOVEMENTS_VAR: &'static str = "RECONCILIATION_ALLOW_EMPTY_MOVEMENTS";
    pub const LOG_LEVEL_VAR: &'static str = "RECONCILIATION_LOG_LEVEL";

    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration from any key/value source, unset keys keep their default
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let min_checkpoints = match lookup(Self::MIN_CHECKPOINTS_VAR) {
            Some(raw) => parse_min_checkpoints(&raw)?,
            None => defaults.min_checkpoints,
        };

        let allow_empty_movements = match lookup(Self::ALLOW_EMPTY_MOVEMENTS_VAR) {
            Some(raw) => parse_bool(Self::ALLOW_EMPTY_MOVEMENTS_VAR, &raw)?,
            None => defaults.allow_empty_movements,
        };

        Ok(Self {
            min_checkpoints,
            allow_empty_movements,
            log_level: lookup(Self::LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
        })
    }
}

fn parse_min_checkpoints(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value >= 2 => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            key: ReconciliationConfig::MIN_CHECKPOINTS_VAR.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
