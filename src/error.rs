//! Error types.
//!
//! - `FitError` is what the library returns: input validation failures, rejected
//!   options and failures reported by a fit evaluator.
//! - `AppError` is what the `remnant` binary returns: a message plus the process
//!   exit code to use.

use crate::domain::FitKey;

/// Errors raised while validating inputs or evaluating fits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Structurally wrong input (in-plane spin components, `q < 1`, NaN values).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Physically valid input beyond the allowed extrapolation envelope.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// An evaluation option the model does not recognize.
    #[error("Unsupported option: '{0}'")]
    UnsupportedOption(String),

    /// Failure reported by the scalar fit collaborator.
    #[error("Fit '{key}' failed: {message}")]
    Evaluator { key: FitKey, message: String },
}

impl FitError {
    pub fn evaluator(key: FitKey, message: impl Into<String>) -> Self {
        Self::Evaluator {
            key,
            message: message.into(),
        }
    }

    /// Process exit code used by the binary for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InvalidInput(_) | FitError::UnsupportedOption(_) => 2,
            FitError::OutOfRange(_) => 3,
            FitError::Evaluator { .. } => 4,
        }
    }
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

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
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
