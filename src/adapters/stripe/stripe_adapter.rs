//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait over the Stripe REST API for
//! one-time checkout payments.
//!
//! # Security
//!
//! - HMAC-SHA256 webhook signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - API key handled via `secrecy::SecretString`

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::PaymentStatus;
use crate::ports::{
    CheckoutSession, CheckoutStatus, CreateCheckoutRequest, PaymentError, PaymentProvider,
    WebhookEvent, WebhookEventType,
};

use super::webhook_types::{
    hex_encode, SignatureHeader, StripeCheckoutSession, StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Creates a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Sets a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Creates a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify a webhook signature using HMAC-SHA256.
    ///
    /// Constant-time comparison, with a timestamp window to reject replays.
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), PaymentError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        let signed_payload = format!(
            "{}.{}",
            header.timestamp,
            String::from_utf8_lossy(payload)
        );

        let mut mac = HmacSha256::new_from_slice(
            self.config.webhook_secret.expose_secret().as_bytes(),
        )
        .expect("HMAC can take key of any size");

        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();

        let expected_bytes: &[u8] = expected.as_slice();
        let provided_bytes: &[u8] = &header.v1_signature;

        if expected_bytes.ct_eq(provided_bytes).unwrap_u8() != 1 {
            tracing::warn!(
                expected_signature = hex_encode(expected_bytes),
                "Invalid webhook signature"
            );
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }

    /// Maps a Stripe checkout session to a domain payment status.
    ///
    /// Stripe reports two axes: session `status` (open/complete/expired) and
    /// `payment_status` (paid/unpaid/no_payment_required). Payment beats
    /// lifecycle: a paid session is `Paid` regardless of anything else.
    fn map_status(session: &StripeCheckoutSession) -> PaymentStatus {
        if session.payment_status.as_deref() == Some("paid") {
            return PaymentStatus::Paid;
        }
        match session.status.as_deref() {
            Some("expired") => PaymentStatus::Expired,
            _ => PaymentStatus::Pending,
        }
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let amount = request.amount_cents.to_string();
        let params = vec![
            ("mode", "payment".to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", request.currency.clone()),
            ("line_items[0][price_data][unit_amount]", amount),
            (
                "line_items[0][price_data][product_data][name]",
                "MindSpace Full Access".to_string(),
            ),
            ("metadata[user_id]", request.user_id.to_string()),
            ("metadata[email]", request.email.clone()),
            ("metadata[package_id]", request.package_id.clone()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe create_checkout_session failed");
            return Err(PaymentError::provider(format!(
                "Stripe API error: {}",
                error_text
            )));
        }

        let session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let redirect_url = session.url.ok_or_else(|| {
            PaymentError::provider("Stripe checkout session has no redirect URL")
        })?;

        let session_id = CheckoutSessionId::new(session.id)
            .map_err(|e| PaymentError::provider(format!("Invalid session id: {}", e)))?;

        tracing::info!(session_id = %session_id, user_id = %request.user_id, "Checkout session created");

        Ok(CheckoutSession {
            session_id,
            redirect_url,
        })
    }

    async fn get_checkout_status(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<CheckoutStatus, PaymentError> {
        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.config.api_base_url, session_id
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PaymentError::not_found("Checkout session"));
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PaymentError::provider(format!(
                "Stripe API error: {}",
                error_text
            )));
        }

        let session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(CheckoutStatus {
            session_id: session_id.clone(),
            payment_status: Self::map_status(&session),
            amount_cents: session.amount_total.unwrap_or(0),
            currency: session.currency.unwrap_or_default(),
        })
    }

    fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        let header = SignatureHeader::parse(signature)
            .map_err(|e| PaymentError::invalid_webhook(e.to_string()))?;

        self.verify_signature(payload, &header)?;

        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        let event_type = match stripe_event.event_type.as_str() {
            "checkout.session.completed" => WebhookEventType::CheckoutSessionCompleted,
            "checkout.session.expired" => WebhookEventType::CheckoutSessionExpired,
            other => WebhookEventType::Unknown(other.to_string()),
        };

        let (session_id, payment_status, metadata) = match event_type {
            WebhookEventType::Unknown(_) => (None, None, Default::default()),
            _ => {
                let session: StripeCheckoutSession =
                    serde_json::from_value(stripe_event.data.object.clone()).map_err(|e| {
                        PaymentError::invalid_webhook(format!("Invalid checkout session: {}", e))
                    })?;
                let status = match event_type {
                    WebhookEventType::CheckoutSessionExpired => PaymentStatus::Expired,
                    _ => Self::map_status(&session),
                };
                let id = CheckoutSessionId::new(session.id)
                    .map_err(|e| PaymentError::invalid_webhook(e.to_string()))?;
                (Some(id), Some(status), session.metadata)
            }
        };

        Ok(WebhookEvent {
            id: stripe_event.id,
            event_type,
            session_id,
            payment_status,
            metadata,
        })
    }
}
