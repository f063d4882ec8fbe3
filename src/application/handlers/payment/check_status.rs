//! CheckPaymentStatusHandler - the Payment Session Tracker's lookup.
//!
//! Consults the provider for the session's current status, records any
//! change on the stored session, and runs the finalize pairing when the
//! provider reports paid. The stored session's status is only ever advanced
//! here and by the webhook path, never directly by the client.

use std::sync::Arc;

use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::{PaymentFlowError, PaymentSession, PaymentStatus};
use crate::ports::{PaymentProvider, PaymentSessionRepository};

use super::finalize_payment::{FinalizePaymentCommand, FinalizePaymentHandler};

/// Query for a payment session's current status.
#[derive(Debug, Clone)]
pub struct CheckPaymentStatusQuery {
    pub session_id: CheckoutSessionId,
}

/// Result of a status check.
#[derive(Debug, Clone)]
pub struct CheckPaymentStatusResult {
    /// The stored session after any update.
    pub session: PaymentSession,
}

/// Handler reconciling stored sessions with the provider's view.
pub struct CheckPaymentStatusHandler {
    sessions: Arc<dyn PaymentSessionRepository>,
    provider: Arc<dyn PaymentProvider>,
    finalize: Arc<FinalizePaymentHandler>,
}

impl CheckPaymentStatusHandler {
    pub fn new(
        sessions: Arc<dyn PaymentSessionRepository>,
        provider: Arc<dyn PaymentProvider>,
        finalize: Arc<FinalizePaymentHandler>,
    ) -> Self {
        Self {
            sessions,
            provider,
            finalize,
        }
    }

    pub async fn handle(
        &self,
        query: CheckPaymentStatusQuery,
    ) -> Result<CheckPaymentStatusResult, PaymentFlowError> {
        let session = self
            .sessions
            .get(&query.session_id)
            .await
            .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?
            .ok_or_else(|| PaymentFlowError::session_not_found(query.session_id.clone()))?;

        // Settled sessions never change; skip the provider round-trip
        if session.is_settled() {
            return Ok(CheckPaymentStatusResult { session });
        }

        let status = self
            .provider
            .get_checkout_status(&query.session_id)
            .await
            .map_err(|e| PaymentFlowError::provider(e.to_string(), e.retryable))?;

        let session = match status.payment_status {
            PaymentStatus::Paid => {
                // Pairing: user access and session status settle together
                self.finalize
                    .handle(FinalizePaymentCommand {
                        session_id: query.session_id.clone(),
                    })
                    .await?;
                self.sessions
                    .get(&query.session_id)
                    .await
                    .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?
                    .ok_or_else(|| {
                        PaymentFlowError::session_not_found(query.session_id.clone())
                    })?
            }
            PaymentStatus::Pending => session,
            terminal => self
                .sessions
                .record_status(&query.session_id, terminal)
                .await
                .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?,
        };

        Ok(CheckPaymentStatusResult { session })
    }
}
