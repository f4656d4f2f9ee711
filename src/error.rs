//! Error types for configuration, loading and export

use thiserror::Error;

/// Errors surfaced by the simulator library
#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Environment variable {name}={value:?} rejected: {reason}")]
    EnvVar {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Unknown scenario preset: {0}")]
    UnknownPreset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MortgageError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MortgageError::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MortgageError>;
