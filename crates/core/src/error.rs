//! Domain error model.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic input failures. Storage failures are
/// modelled by the infra crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more field rules failed.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// An identifier could not be parsed.
    #[error("invalid id format: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(raw: impl Into<String>) -> Self {
        Self::InvalidId(raw.into())
    }
}
