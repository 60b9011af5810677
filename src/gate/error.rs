//! Gate construction errors.

use thiserror::Error;

use crate::config::{describe_errors, ConfigError, ValidationError};
use crate::decision::BackendError;

/// Why a gate could not be built.
#[derive(Debug, Error)]
pub enum GateError {
    /// Gate settings failed validation.
    #[error("invalid gate configuration: {}", describe_errors(.0))]
    Config(Vec<ValidationError>),

    /// The evaluator source could not be read.
    #[error("evaluator script unavailable: {0}")]
    Script(#[from] ConfigError),

    /// Connecting or registering the evaluator failed.
    #[error("decision backend unavailable: {0}")]
    Backend(#[from] BackendError),
}

