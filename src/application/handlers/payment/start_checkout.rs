//! StartCheckoutHandler - Command handler for initiating a checkout.
//!
//! Validates the package against the server-side catalog, rejects users who
//! already hold full access, creates the provider checkout session, and
//! persists the pending session record before returning the redirect.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::payment::{PaymentFlowError, PaymentPackage, PaymentSession};
use crate::ports::{CreateCheckoutRequest, PaymentProvider, PaymentSessionRepository, UserStore};

/// Command to start a checkout for a package.
#[derive(Debug, Clone)]
pub struct StartCheckoutCommand {
    pub user_id: UserId,

    /// Package id from the catalog.
    pub package_id: String,

    /// Origin of the calling frontend, used to build the return URLs.
    pub return_origin: String,
}

/// Result of starting a checkout.
#[derive(Debug, Clone)]
pub struct StartCheckoutResult {
    /// Provider-issued session id.
    pub session_id: crate::domain::foundation::CheckoutSessionId,

    /// URL to redirect the user to for payment.
    pub redirect_url: String,
}

/// Handler for initiating checkout sessions.
pub struct StartCheckoutHandler {
    user_store: Arc<dyn UserStore>,
    sessions: Arc<dyn PaymentSessionRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl StartCheckoutHandler {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        sessions: Arc<dyn PaymentSessionRepository>,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            user_store,
            sessions,
            provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartCheckoutCommand,
    ) -> Result<StartCheckoutResult, PaymentFlowError> {
        // Amount comes from the catalog, never from the client
        let package = PaymentPackage::lookup(&cmd.package_id)
            .ok_or_else(|| PaymentFlowError::unknown_package(&cmd.package_id))?;

        let user = self
            .user_store
            .get(&cmd.user_id)
            .await
            .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?
            .ok_or_else(|| {
                PaymentFlowError::infrastructure(format!("User not found: {}", cmd.user_id))
            })?;

        if user.has_paid {
            return Err(PaymentFlowError::AlreadyPaid);
        }

        let origin = cmd.return_origin.trim_end_matches('/');
        let request = CreateCheckoutRequest {
            user_id: user.id.clone(),
            email: user.email.clone(),
            package_id: package.id.to_string(),
            amount_cents: package.amount_cents,
            currency: package.currency.to_string(),
            success_url: format!(
                "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
                origin
            ),
            cancel_url: format!("{}/payment-cancel", origin),
        };

        let checkout = self
            .provider
            .create_checkout_session(request)
            .await
            .map_err(|e| PaymentFlowError::provider(e.to_string(), e.retryable))?;

        // The pending record must exist before the user is redirected, so
        // the confirmation flow always finds the session on return
        let session = PaymentSession::new(
            checkout.session_id.clone(),
            user.id.clone(),
            user.email,
            package.id,
            package.amount_cents,
            package.currency,
        );
        self.sessions
            .insert(session)
            .await
            .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?;

        tracing::info!(
            session_id = %checkout.session_id,
            user_id = %cmd.user_id,
            package_id = %cmd.package_id,
            "Checkout session created"
        );

        Ok(StartCheckoutResult {
            session_id: checkout.session_id,
            redirect_url: checkout.redirect_url,
        })
    }
}
