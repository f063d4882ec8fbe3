//! Entitlement-specific error types.

use crate::domain::foundation::{UserId, ValidationError};

/// Errors from entitlement operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// No user record exists for this id.
    UserNotFound(UserId),

    /// The submission or score failed validation.
    InvalidInput(ValidationError),

    /// Backing store failure.
    Infrastructure(String),
}

impl EntitlementError {
    pub fn user_not_found(user_id: UserId) -> Self {
        EntitlementError::UserNotFound(user_id)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EntitlementError::Infrastructure(message.into())
    }
}

impl From<ValidationError> for EntitlementError {
    fn from(err: ValidationError) -> Self {
        EntitlementError::InvalidInput(err)
    }
}

impl std::fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntitlementError::UserNotFound(id) => write!(f, "User not found: {}", id),
            EntitlementError::InvalidInput(err) => write!(f, "Invalid input: {}", err),
            EntitlementError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for EntitlementError {}
