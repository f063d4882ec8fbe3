//! Payment flow error types.

use crate::domain::foundation::CheckoutSessionId;

/// Errors from the checkout and confirmation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentFlowError {
    /// No session record exists for this id. Surfaced to the caller as a
    /// payment verification issue.
    SessionNotFound(CheckoutSessionId),

    /// The requested package id is not in the catalog.
    UnknownPackage(String),

    /// The user has already unlocked full access.
    AlreadyPaid,

    /// Invalid state for the requested operation.
    InvalidState { current: String, attempted: String },

    /// Webhook signature verification failed.
    InvalidWebhookSignature,

    /// The payment provider rejected or failed the request.
    Provider { message: String, retryable: bool },

    /// Backing store failure.
    Infrastructure(String),
}

impl PaymentFlowError {
    pub fn session_not_found(id: CheckoutSessionId) -> Self {
        PaymentFlowError::SessionNotFound(id)
    }

    pub fn unknown_package(package_id: impl Into<String>) -> Self {
        PaymentFlowError::UnknownPackage(package_id.into())
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        PaymentFlowError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn provider(message: impl Into<String>, retryable: bool) -> Self {
        PaymentFlowError::Provider {
            message: message.into(),
            retryable,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentFlowError::Infrastructure(message.into())
    }

    /// True when a retry can reasonably be expected to succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentFlowError::Provider { retryable: true, .. })
    }
}

impl std::fmt::Display for PaymentFlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentFlowError::SessionNotFound(id) => {
                write!(f, "Payment session not found: {}", id)
            }
            PaymentFlowError::UnknownPackage(id) => write!(f, "Invalid payment package: {}", id),
            PaymentFlowError::AlreadyPaid => {
                write!(f, "You have already unlocked full access")
            }
            PaymentFlowError::InvalidState { current, attempted } => {
                write!(f, "Cannot {} from state {}", attempted, current)
            }
            PaymentFlowError::InvalidWebhookSignature => {
                write!(f, "Webhook signature verification failed")
            }
            PaymentFlowError::Provider { message, .. } => {
                write!(f, "Payment provider error: {}", message)
            }
            PaymentFlowError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
        }
    }
}

impl std::error::Error for PaymentFlowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_retryable_provider_errors_are_retryable() {
        assert!(PaymentFlowError::provider("timeout", true).is_retryable());
        assert!(!PaymentFlowError::provider("declined", false).is_retryable());
        assert!(!PaymentFlowError::AlreadyPaid.is_retryable());
    }

    #[test]
    fn display_includes_session_id() {
        let id = crate::domain::foundation::CheckoutSessionId::new("cs_x").unwrap();
        let err = PaymentFlowError::session_not_found(id);
        assert!(err.to_string().contains("cs_x"));
    }
}
