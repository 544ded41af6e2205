//! Service Errors

use thiserror::Error;

/// Failures surfaced to callers of the services
///
/// The message is always shown to the player as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Missing or malformed field, unknown game mode
    #[error("{0}")]
    InvalidArgument(String),

    /// No leaderboard entry for the requested address and mode
    #[error("{0}")]
    NotFound(String),

    /// Store failure or an entry that cannot be ranked
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(message.into())
    }

    pub fn missing_field(field: &str) -> Self {
        ServiceError::InvalidArgument(format!("Missing required field: {}", field))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
