//! Domain errors for the lureforge simulation orchestrator.

use thiserror::Error;

/// Domain-level errors that can occur while orchestrating a simulation.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Backend call failed: {0}")]
    BackendFailed(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Step '{step}' returned no '{field}'")]
    MissingField { step: String, field: String },

    #[error("Telephony error: {0}")]
    Telephony(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether this error is worth a second attempt or the next fallback
    /// level. Validation problems are final; backend hiccups are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::BackendFailed(_) | Self::Timeout(_) | Self::Http(_)
        )
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        DomainError::Http(err.to_string())
    }
}
