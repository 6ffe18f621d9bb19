//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A string could not be parsed as an identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl From<uuid::Error> for CoreError {
    fn from(err: uuid::Error) -> Self {
        CoreError::InvalidIdentifier(err.to_string())
    }
}
