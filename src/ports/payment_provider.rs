//! Payment provider port for external checkout processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Implementations handle the actual checkout creation, status lookups, and
//! webhook verification.
//!
//! # Design
//!
//! - **Gateway agnostic**: the interface works with any hosted-checkout
//!   provider
//! - **One-time payments**: optimized for a single fixed-price unlock, not
//!   recurring billing
//! - **Retryable classification**: errors carry whether a retry is sensible,
//!   which the confirmation poller relies on

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CheckoutSessionId, UserId};
use crate::domain::payment::PaymentStatus;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates a hosted checkout session and returns its id and redirect URL.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Looks up the provider's current status for a checkout session.
    async fn get_checkout_status(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<CheckoutStatus, PaymentError>;

    /// Verifies a webhook signature and parses the event.
    ///
    /// Returns the parsed event if valid, error if the signature is invalid.
    fn verify_webhook(&self, payload: &[u8], signature: &str)
        -> Result<WebhookEvent, PaymentError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Internal user id (carried as checkout metadata).
    pub user_id: UserId,

    /// User email (carried as checkout metadata).
    pub email: String,

    /// Package id from the server-side catalog.
    pub package_id: String,

    /// Amount in cents (from the catalog, never client-supplied).
    pub amount_cents: i64,

    /// ISO currency code.
    pub currency: String,

    /// Where the provider redirects after payment completes. The provider
    /// substitutes its session id into the `{CHECKOUT_SESSION_ID}` slot.
    pub success_url: String,

    /// Where the provider redirects when the user abandons checkout.
    pub cancel_url: String,
}

/// A created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider-issued session id.
    pub session_id: CheckoutSessionId,

    /// URL to redirect the user to for payment.
    pub redirect_url: String,
}

/// Provider-reported status of a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutStatus {
    /// The session this status describes.
    pub session_id: CheckoutSessionId,

    /// Current payment status.
    pub payment_status: PaymentStatus,

    /// Amount in cents, as the provider recorded it.
    pub amount_cents: i64,

    /// ISO currency code.
    pub currency: String,
}

/// A verified webhook event from the provider.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Provider event id (for deduplication).
    pub id: String,

    /// Event type.
    pub event_type: WebhookEventType,

    /// Session the event concerns, when present.
    pub session_id: Option<CheckoutSessionId>,

    /// Payment status carried by the event, when present.
    pub payment_status: Option<PaymentStatus>,

    /// Metadata attached at checkout creation (user_id, email, package_id).
    pub metadata: std::collections::HashMap<String, String>,
}

/// Webhook event types this core reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    /// Checkout completed; payment outcome is in the payload.
    CheckoutSessionCompleted,

    /// Checkout session expired before payment.
    CheckoutSessionExpired,

    /// Anything else; acknowledged but not processed.
    Unknown(String),
}

/// Error from a payment provider operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error category.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether a retry can reasonably be expected to succeed.
    pub retryable: bool,
}

impl PaymentError {
    /// Creates a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Creates an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    /// Creates a provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Invalid webhook signature.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
