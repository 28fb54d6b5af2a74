//! Error types.
//!
//! The library surfaces typed errors (`DecisionError`, `SinkError`) so callers can
//! tell a rejected input apart from a broken model or a failing store. The binary
//! flattens everything into `AppError`, which carries the process exit code.
//!
//! Exit codes:
//! - `2`: invalid input, configuration, or I/O
//! - `4`: model or computation failure

use thiserror::Error;

/// Structured validation failure: which field, and which constraint it broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

/// Failure writing to or reading from an audit/feedback or customer store.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store record could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors produced by the decision pipeline.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("risk model unavailable: {0}")]
    ModelUnavailable(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<DecisionError> for AppError {
    fn from(err: DecisionError) -> Self {
        let code = match &err {
            DecisionError::Validation(_) => 2,
            DecisionError::ModelUnavailable(_) => 4,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<SinkError> for AppError {
    fn from(err: SinkError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(2, format!("validation failed: {err}"))
    }
}
