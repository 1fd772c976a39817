//! Cover error types

use thiserror::Error;
use timecover_travel::ConfigError;

/// Cover-level errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoverError {
    #[error("Tilt is not configured for cover '{0}'")]
    TiltNotConfigured(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<CoverError> for String {
    fn from(err: CoverError) -> Self {
        err.to_string()
    }
}

/// Result type for cover operations
pub type CoverResult<T> = Result<T, CoverError>;
