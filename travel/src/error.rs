//! Travel configuration errors

use thiserror::Error;

/// Errors raised while loading travel timing configuration.
///
/// The estimator itself never fails; these only come out of config parsing
/// and validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Negative duration for {field}: {value}s")]
    NegativeDuration { field: &'static str, value: f64 },

    #[error("Duration for {field} is not a finite number: {value}")]
    NonFiniteDuration { field: &'static str, value: f64 },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<ConfigError> for String {
    fn from(err: ConfigError) -> Self {
        err.to_string()
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
