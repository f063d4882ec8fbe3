//! ConfirmationPoller - bounded polling loop for the post-checkout return.
//!
//! When the user lands back on the app after checkout, the payment may not
//! be confirmed yet. The poller repeatedly checks the session until it
//! settles or the attempt budget runs out. Every run terminates: paid,
//! expired, failed, unrecoverable error, or timeout after `max_attempts`
//! lookups with `interval` between them.
//!
//! Retryable provider failures (network, rate limit) consume an attempt and
//! the loop continues; anything else ends the run with an error outcome.

use std::sync::Arc;

use crate::config::PollerConfig;
use crate::domain::entitlement::{evaluate, AccessDecision};
use crate::domain::foundation::{CheckoutSessionId, UserId};
use crate::domain::payment::{PaymentFlowError, PaymentStatus};
use crate::ports::UserStore;

use super::check_status::{CheckPaymentStatusHandler, CheckPaymentStatusQuery};

/// Terminal outcome of a polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Payment confirmed and access unlocked. Carries the user's fresh
    /// entitlement decision so the caller can render it directly.
    Success { decision: AccessDecision },

    /// The checkout session expired without payment.
    Expired,

    /// The run hit an unrecoverable error.
    Error { message: String },

    /// The attempt budget ran out with the payment still unconfirmed. The
    /// payment may yet settle through the webhook path.
    Timeout,
}

impl PollOutcome {
    /// User-facing message for this outcome.
    ///
    /// Non-success outcomes never silently grant or deny access; ambiguous
    /// charges are reconciled manually, and the message says so.
    pub fn user_message(&self) -> String {
        match self {
            PollOutcome::Success { decision } => decision.user_message(),
            PollOutcome::Expired => {
                "Your payment session expired. No charge was made; please try again.".to_string()
            }
            PollOutcome::Error { .. } | PollOutcome::Timeout => {
                "We could not confirm your payment. If you were charged, your access \
                 will be unlocked shortly; contact support if it is not."
                    .to_string()
            }
        }
    }
}

/// Polls a checkout session until it reaches a terminal outcome.
pub struct ConfirmationPoller {
    check_status: Arc<CheckPaymentStatusHandler>,
    user_store: Arc<dyn UserStore>,
    free_limit: u32,
    config: PollerConfig,
}

impl ConfirmationPoller {
    pub fn new(
        check_status: Arc<CheckPaymentStatusHandler>,
        user_store: Arc<dyn UserStore>,
        free_limit: u32,
        config: PollerConfig,
    ) -> Self {
        Self {
            check_status,
            user_store,
            free_limit,
            config,
        }
    }

    /// Runs the polling loop for one session. Cancellation-safe: dropping
    /// the future between lookups leaves no state behind beyond whatever
    /// the last completed lookup recorded.
    pub async fn poll_until_terminal(&self, session_id: &CheckoutSessionId) -> PollOutcome {
        for attempt in 1..=self.config.max_attempts {
            tracing::debug!(
                session_id = %session_id,
                attempt,
                max_attempts = self.config.max_attempts,
                "Checking payment status"
            );

            match self
                .check_status
                .handle(CheckPaymentStatusQuery {
                    session_id: session_id.clone(),
                })
                .await
            {
                Ok(result) => match result.session.status {
                    PaymentStatus::Paid => {
                        return self.success_outcome(&result.session.user_id).await;
                    }
                    PaymentStatus::Expired => {
                        tracing::info!(session_id = %session_id, "Payment session expired");
                        return PollOutcome::Expired;
                    }
                    PaymentStatus::Failed => {
                        tracing::warn!(session_id = %session_id, "Payment failed");
                        return PollOutcome::Error {
                            message: "Payment failed".to_string(),
                        };
                    }
                    PaymentStatus::Pending => {}
                },
                Err(err) if err.is_retryable() => {
                    tracing::warn!(
                        session_id = %session_id,
                        attempt,
                        error = %err,
                        "Retryable error during payment check"
                    );
                }
                Err(err) => {
                    tracing::error!(session_id = %session_id, error = %err, "Payment check failed");
                    return PollOutcome::Error {
                        message: err.to_string(),
                    };
                }
            }

            // No sleep after the final attempt
            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.interval()).await;
            }
        }

        tracing::warn!(
            session_id = %session_id,
            attempts = self.config.max_attempts,
            "Payment confirmation timed out"
        );
        PollOutcome::Timeout
    }

    /// Re-reads the user so the returned decision reflects the granted
    /// access, not the record from before finalization.
    async fn success_outcome(&self, user_id: &UserId) -> PollOutcome {
        match self.user_store.get(user_id).await {
            Ok(Some(user)) => PollOutcome::Success {
                decision: evaluate(&user, self.free_limit),
            },
            Ok(None) => PollOutcome::Error {
                message: format!("User not found after payment: {}", user_id),
            },
            Err(err) => PollOutcome::Error {
                message: PaymentFlowError::infrastructure(err.to_string()).to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionRepository, InMemoryUserStore};
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::application::handlers::payment::FinalizePaymentHandler;
    use crate::domain::entitlement::UserRecord;
    use crate::domain::payment::PaymentSession;
    use crate::ports::{PaymentError, PaymentSessionRepository};

    struct Fixture {
        poller: ConfirmationPoller,
        users: Arc<InMemoryUserStore>,
        provider: MockPaymentProvider,
        user_id: UserId,
        session_id: CheckoutSessionId,
    }

    async fn fixture() -> Fixture {
        let user = UserRecord::new(UserId::generate(), "a@example.com");
        let user_id = user.id.clone();
        let users = Arc::new(InMemoryUserStore::with_users([user]));
        let sessions = Arc::new(InMemorySessionRepository::new());
        let provider = MockPaymentProvider::new();

        let session_id = CheckoutSessionId::new("cs_1").unwrap();
        sessions
            .insert(PaymentSession::new(
                session_id.clone(),
                user_id.clone(),
                "a@example.com",
                "unlock_full_access",
                100,
                "usd",
            ))
            .await
            .unwrap();

        let finalize = Arc::new(FinalizePaymentHandler::new(users.clone(), sessions.clone()));
        let check_status = Arc::new(CheckPaymentStatusHandler::new(
            sessions,
            Arc::new(provider.clone()),
            finalize,
        ));
        let poller = ConfirmationPoller::new(
            check_status,
            users.clone(),
            crate::domain::entitlement::DEFAULT_FREE_LIMIT,
            PollerConfig::default(),
        );

        Fixture {
            poller,
            users,
            provider,
            user_id,
            session_id,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pending_then_paid_resolves_to_success() {
        let f = fixture().await;
        f.provider.script_statuses([
            Ok(PaymentStatus::Pending),
            Ok(PaymentStatus::Pending),
            Ok(PaymentStatus::Paid),
        ]);

        let outcome = f.poller.poll_until_terminal(&f.session_id).await;
        assert_eq!(
            outcome,
            PollOutcome::Success {
                decision: AccessDecision::GrantedPaid
            }
        );
        assert_eq!(f.provider.status_call_count(), 3);

        // Access was granted before the outcome was returned
        let user = f.users.get(&f.user_id).await.unwrap().unwrap();
        assert!(user.has_paid);
    }

    #[tokio::test(start_paused = true)]
    async fn always_pending_times_out_after_the_attempt_budget() {
        let f = fixture().await;
        f.provider.script_statuses([Ok(PaymentStatus::Pending)]);

        let outcome = f.poller.poll_until_terminal(&f.session_id).await;
        assert_eq!(outcome, PollOutcome::Timeout);
        assert_eq!(f.provider.status_call_count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_session_ends_the_run() {
        let f = fixture().await;
        f.provider.script_statuses([
            Ok(PaymentStatus::Pending),
            Ok(PaymentStatus::Expired),
        ]);

        let outcome = f.poller.poll_until_terminal(&f.session_id).await;
        assert_eq!(outcome, PollOutcome::Expired);
        assert_eq!(f.provider.status_call_count(), 2);

        let user = f.users.get(&f.user_id).await.unwrap().unwrap();
        assert!(!user.has_paid);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_payment_ends_with_an_error_outcome() {
        let f = fixture().await;
        f.provider.script_statuses([Ok(PaymentStatus::Failed)]);

        let outcome = f.poller.poll_until_terminal(&f.session_id).await;
        assert!(matches!(outcome, PollOutcome::Error { .. }));
        assert_eq!(f.provider.status_call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_errors_consume_attempts_and_keep_polling() {
        let f = fixture().await;
        f.provider.script_statuses([
            Err(PaymentError::network("connection reset")),
            Err(PaymentError::network("connection reset")),
            Ok(PaymentStatus::Paid),
        ]);

        let outcome = f.poller.poll_until_terminal(&f.session_id).await;
        assert_eq!(
            outcome,
            PollOutcome::Success {
                decision: AccessDecision::GrantedPaid
            }
        );
        assert_eq!(f.provider.status_call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_stops_immediately() {
        let f = fixture().await;
        f.provider
            .script_statuses([Err(PaymentError::provider("account disabled"))]);

        let outcome = f.poller.poll_until_terminal(&f.session_id).await;
        assert!(matches!(outcome, PollOutcome::Error { .. }));
        assert_eq!(f.provider.status_call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_session_is_an_error_outcome() {
        let f = fixture().await;

        let missing = CheckoutSessionId::new("cs_missing").unwrap();
        let outcome = f.poller.poll_until_terminal(&missing).await;
        assert!(matches!(outcome, PollOutcome::Error { .. }));
        assert_eq!(f.provider.status_call_count(), 0);
    }

    #[test]
    fn ambiguous_outcomes_promise_manual_reconciliation() {
        assert!(PollOutcome::Timeout.user_message().contains("charged"));
        assert!(PollOutcome::Error {
            message: "x".to_string()
        }
        .user_message()
        .contains("charged"));
        assert!(PollOutcome::Expired.user_message().contains("expired"));
    }

    #[tokio::test(start_paused = true)]
    async fn beta_tester_success_reports_beta_decision() {
        let f = fixture().await;
        let mut user = f.users.get(&f.user_id).await.unwrap().unwrap();
        user.is_beta_tester = true;
        f.users.put(user);
        f.provider.script_statuses([Ok(PaymentStatus::Paid)]);

        let outcome = f.poller.poll_until_terminal(&f.session_id).await;
        assert_eq!(
            outcome,
            PollOutcome::Success {
                decision: AccessDecision::GrantedBeta
            }
        );
    }
}
