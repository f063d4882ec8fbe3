//! HandleWebhookHandler - server-to-server payment notifications.
//!
//! Verifies the provider signature before anything else, then routes the
//! event. Completed checkouts with a paid status run the finalize pairing;
//! expired checkouts settle the stored session as expired. Unrecognized
//! events are acknowledged without processing so the provider stops
//! redelivering them.

use std::sync::Arc;

use crate::domain::payment::{PaymentFlowError, PaymentStatus};
use crate::ports::{PaymentProvider, PaymentSessionRepository, WebhookEventType};

use super::finalize_payment::{FinalizePaymentCommand, FinalizePaymentHandler};

/// A raw webhook delivery as received from the provider.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    /// Raw request body, exactly as delivered. Signature verification runs
    /// over these bytes, so they must not be re-serialized.
    pub payload: Vec<u8>,

    /// Value of the provider's signature header.
    pub signature: String,
}

/// Outcome of processing a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A paid checkout was finalized and the user's access unlocked.
    AccessUnlocked,

    /// The event was a duplicate of one already applied; nothing changed.
    AlreadyProcessed,

    /// The checkout session expired without payment.
    SessionExpired,

    /// Event type not handled by this core; acknowledged as received.
    Ignored,
}

/// Handler for provider webhook deliveries.
pub struct HandleWebhookHandler {
    provider: Arc<dyn PaymentProvider>,
    sessions: Arc<dyn PaymentSessionRepository>,
    finalize: Arc<FinalizePaymentHandler>,
}

impl HandleWebhookHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        sessions: Arc<dyn PaymentSessionRepository>,
        finalize: Arc<FinalizePaymentHandler>,
    ) -> Self {
        Self {
            provider,
            sessions,
            finalize,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleWebhookCommand,
    ) -> Result<WebhookOutcome, PaymentFlowError> {
        let event = self
            .provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected webhook delivery");
                PaymentFlowError::InvalidWebhookSignature
            })?;

        match event.event_type {
            WebhookEventType::CheckoutSessionCompleted => {
                let Some(session_id) = event.session_id else {
                    tracing::warn!(event_id = %event.id, "Completed event without session id");
                    return Ok(WebhookOutcome::Ignored);
                };

                // A completed checkout can still be unpaid (e.g. delayed
                // payment methods); only a paid status unlocks access
                if event.payment_status != Some(PaymentStatus::Paid) {
                    tracing::info!(
                        event_id = %event.id,
                        session_id = %session_id,
                        "Checkout completed but not paid; leaving session pending"
                    );
                    return Ok(WebhookOutcome::Ignored);
                }

                use super::finalize_payment::FinalizePaymentResult;
                let result = self
                    .finalize
                    .handle(FinalizePaymentCommand { session_id })
                    .await?;
                match result {
                    FinalizePaymentResult::AccessUnlocked { .. } => {
                        Ok(WebhookOutcome::AccessUnlocked)
                    }
                    FinalizePaymentResult::AlreadyFinalized => {
                        Ok(WebhookOutcome::AlreadyProcessed)
                    }
                }
            }
            WebhookEventType::CheckoutSessionExpired => {
                let Some(session_id) = event.session_id else {
                    return Ok(WebhookOutcome::Ignored);
                };

                // A settled session keeps its outcome; a late expiry
                // notification for it is acknowledged and dropped
                let session = self
                    .sessions
                    .get(&session_id)
                    .await
                    .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?;
                match session {
                    None => return Ok(WebhookOutcome::Ignored),
                    Some(s) if s.is_settled() => return Ok(WebhookOutcome::AlreadyProcessed),
                    Some(_) => {}
                }

                self.sessions
                    .record_status(&session_id, PaymentStatus::Expired)
                    .await
                    .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?;
                tracing::info!(session_id = %session_id, "Checkout session expired");
                Ok(WebhookOutcome::SessionExpired)
            }
            WebhookEventType::Unknown(ref kind) => {
                tracing::debug!(event_id = %event.id, kind = %kind, "Ignoring webhook event");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }
}
