//! Mock payment provider for testing.
//!
//! Configurable implementation of `PaymentProvider` for unit and integration
//! tests. Supports scripted per-attempt statuses, error injection, and call
//! tracking, which the confirmation poller tests rely on.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::PaymentStatus;
use crate::ports::{
    CheckoutSession, CheckoutStatus, CreateCheckoutRequest, PaymentError, PaymentProvider,
    WebhookEvent,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Status lookups return pending twice, then paid
/// mock.script_statuses([
///     Ok(PaymentStatus::Pending),
///     Ok(PaymentStatus::Pending),
///     Ok(PaymentStatus::Paid),
/// ]);
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Session to return from the next `create_checkout_session` call.
    next_checkout: Option<CheckoutSession>,

    /// Error to return from the next `create_checkout_session` call.
    next_checkout_error: Option<PaymentError>,

    /// Scripted results for successive `get_checkout_status` calls.
    /// When exhausted, the last scripted status repeats.
    status_script: VecDeque<Result<PaymentStatus, PaymentError>>,

    /// Last script entry, repeated once the queue drains.
    last_status: Option<Result<PaymentStatus, PaymentError>>,

    /// Event to return from `verify_webhook`, or None to reject.
    webhook_event: Option<WebhookEvent>,

    /// Count of `get_checkout_status` calls.
    status_calls: u32,

    /// Requests passed to `create_checkout_session`.
    checkout_requests: Vec<CreateCheckoutRequest>,
}

impl MockPaymentProvider {
    /// Creates a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the checkout session returned on the next creation call.
    pub fn set_checkout_session(&self, session_id: &str, redirect_url: &str) {
        self.inner.lock().unwrap().next_checkout = Some(CheckoutSession {
            session_id: CheckoutSessionId::new(session_id).unwrap(),
            redirect_url: redirect_url.to_string(),
        });
    }

    /// Injects an error for the next creation call.
    pub fn fail_next_checkout(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_checkout_error = Some(error);
    }

    /// Scripts the results of successive status lookups. The final entry
    /// repeats once the script is exhausted.
    pub fn script_statuses(
        &self,
        results: impl IntoIterator<Item = Result<PaymentStatus, PaymentError>>,
    ) {
        let mut state = self.inner.lock().unwrap();
        state.status_script = results.into_iter().collect();
        state.last_status = state.status_script.back().cloned();
    }

    /// Sets the event returned by `verify_webhook`.
    pub fn set_webhook_event(&self, event: WebhookEvent) {
        self.inner.lock().unwrap().webhook_event = Some(event);
    }

    /// Number of status lookups performed so far.
    pub fn status_call_count(&self) -> u32 {
        self.inner.lock().unwrap().status_calls
    }

    /// Checkout requests captured so far.
    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.inner.lock().unwrap().checkout_requests.clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.checkout_requests.push(request);

        if let Some(error) = state.next_checkout_error.take() {
            return Err(error);
        }

        state.next_checkout.take().ok_or_else(|| {
            PaymentError::provider("MockPaymentProvider: no checkout session configured")
        })
    }

    async fn get_checkout_status(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<CheckoutStatus, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.status_calls += 1;

        let result = state
            .status_script
            .pop_front()
            .or_else(|| state.last_status.clone())
            .unwrap_or_else(|| {
                Err(PaymentError::provider(
                    "MockPaymentProvider: no status scripted",
                ))
            });

        result.map(|payment_status| CheckoutStatus {
            session_id: session_id.clone(),
            payment_status,
            amount_cents: 100,
            currency: "usd".to_string(),
        })
    }

    fn verify_webhook(
        &self,
        _payload: &[u8],
        _signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.inner
            .lock()
            .unwrap()
            .webhook_event
            .clone()
            .ok_or_else(|| PaymentError::invalid_webhook("MockPaymentProvider: rejecting webhook"))
    }
}

/// Builds a mock webhook event for tests.
pub fn mock_checkout_completed_event(
    session_id: &str,
    user_id: &str,
    email: &str,
) -> WebhookEvent {
    use crate::ports::WebhookEventType;

    let mut metadata = HashMap::new();
    metadata.insert("user_id".to_string(), user_id.to_string());
    metadata.insert("email".to_string(), email.to_string());
    metadata.insert("package_id".to_string(), "unlock_full_access".to_string());

    WebhookEvent {
        id: format!("evt_mock_{}", session_id),
        event_type: WebhookEventType::CheckoutSessionCompleted,
        session_id: Some(CheckoutSessionId::new(session_id).unwrap()),
        payment_status: Some(PaymentStatus::Paid),
        metadata,
    }
}
