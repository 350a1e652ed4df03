//! Errors for the shared primitives.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// A primitive value could not be constructed from caller input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{kind} must not be blank")]
    Blank { kind: &'static str },

    #[error("malformed {kind}: {reason}")]
    InvalidId { kind: &'static str, reason: String },
}

impl DomainError {
    pub fn invalid_id(kind: &'static str, reason: impl ToString) -> Self {
        Self::InvalidId { kind, reason: reason.to_string() }
    }
}
