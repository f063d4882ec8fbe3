//! FinalizePaymentHandler - the payment-confirmed / access-granted pairing.
//!
//! Invoked when the provider reports a session as paid. Sets the owning
//! user's `has_paid` flag and settles the session as one logical
//! transaction. This is the core correctness boundary of the subsystem: a
//! payment must never be marked paid without the user's access being
//! granted, and access must never be granted without a confirmed paid
//! session.
//!
//! Ordering: access is granted first, the session is settled second. If the
//! second step fails the session stays pending and the whole operation is
//! retried; both steps are idempotent, so a retry (or a duplicate webhook
//! delivery) converges on the same end state.

use std::sync::Arc;

use crate::domain::entitlement::UserRecord;
use crate::domain::foundation::CheckoutSessionId;
use crate::domain::payment::{PaymentFlowError, PaymentStatus};
use crate::ports::{PaymentSessionRepository, UserStore};

/// Command to finalize a paid session.
#[derive(Debug, Clone)]
pub struct FinalizePaymentCommand {
    pub session_id: CheckoutSessionId,
}

/// Result of finalization.
#[derive(Debug, Clone)]
pub enum FinalizePaymentResult {
    /// The session was settled and the user's access unlocked.
    AccessUnlocked { user: UserRecord },

    /// The session was already settled as paid; nothing changed.
    AlreadyFinalized,
}

/// Handler applying the paid-session / access-granted pairing.
pub struct FinalizePaymentHandler {
    user_store: Arc<dyn UserStore>,
    sessions: Arc<dyn PaymentSessionRepository>,
}

impl FinalizePaymentHandler {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        sessions: Arc<dyn PaymentSessionRepository>,
    ) -> Self {
        Self {
            user_store,
            sessions,
        }
    }

    pub async fn handle(
        &self,
        cmd: FinalizePaymentCommand,
    ) -> Result<FinalizePaymentResult, PaymentFlowError> {
        let session = self
            .sessions
            .get(&cmd.session_id)
            .await
            .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?
            .ok_or_else(|| PaymentFlowError::session_not_found(cmd.session_id.clone()))?;

        match session.status {
            PaymentStatus::Paid => return Ok(FinalizePaymentResult::AlreadyFinalized),
            PaymentStatus::Pending => {}
            other => {
                return Err(PaymentFlowError::invalid_state(
                    format!("{:?}", other),
                    "finalize_on_paid",
                ))
            }
        }

        // Grant access first: if settling the session fails afterwards, the
        // session stays pending and the retry re-applies both steps
        let user = self
            .user_store
            .grant_paid_access(&session.user_id)
            .await
            .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?;

        self.sessions
            .record_status(&cmd.session_id, PaymentStatus::Paid)
            .await
            .map_err(|e| PaymentFlowError::infrastructure(e.to_string()))?;

        tracing::info!(
            session_id = %cmd.session_id,
            user_id = %session.user_id,
            "User unlocked full access via payment"
        );

        Ok(FinalizePaymentResult::AccessUnlocked { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionRepository, InMemoryUserStore};
    use crate::domain::foundation::UserId;
    use crate::domain::payment::PaymentSession;

    struct Fixture {
        handler: FinalizePaymentHandler,
        users: Arc<InMemoryUserStore>,
        sessions: Arc<InMemorySessionRepository>,
        user_id: UserId,
        session_id: CheckoutSessionId,
    }

    async fn fixture() -> Fixture {
        let user = UserRecord::new(UserId::generate(), "a@example.com");
        let user_id = user.id.clone();
        let users = Arc::new(InMemoryUserStore::with_users([user]));
        let sessions = Arc::new(InMemorySessionRepository::new());

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

        let handler = FinalizePaymentHandler::new(users.clone(), sessions.clone());
        Fixture {
            handler,
            users,
            sessions,
            user_id,
            session_id,
        }
    }

    #[tokio::test]
    async fn finalize_pairs_session_and_access() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(FinalizePaymentCommand {
                session_id: f.session_id.clone(),
            })
            .await
            .unwrap();

        assert!(matches!(
            result,
            FinalizePaymentResult::AccessUnlocked { ref user } if user.has_paid
        ));
        let session = f.sessions.get(&f.session_id).await.unwrap().unwrap();
        assert_eq!(session.status, PaymentStatus::Paid);
        let user = f.users.get(&f.user_id).await.unwrap().unwrap();
        assert!(user.has_paid);
    }

    #[tokio::test]
    async fn finalize_twice_equals_finalize_once() {
        let f = fixture().await;

        let cmd = FinalizePaymentCommand {
            session_id: f.session_id.clone(),
        };
        f.handler.handle(cmd.clone()).await.unwrap();
        let second = f.handler.handle(cmd).await.unwrap();

        assert!(matches!(second, FinalizePaymentResult::AlreadyFinalized));
        let user = f.users.get(&f.user_id).await.unwrap().unwrap();
        assert!(user.has_paid);
        assert_eq!(user.free_reflections_used, 0);
    }

    #[tokio::test]
    async fn unknown_session_fails_with_not_found() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(FinalizePaymentCommand {
                session_id: CheckoutSessionId::new("cs_missing").unwrap(),
            })
            .await;
        assert!(matches!(result, Err(PaymentFlowError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn expired_session_cannot_be_finalized() {
        let f = fixture().await;
        f.sessions
            .record_status(&f.session_id, PaymentStatus::Expired)
            .await
            .unwrap();

        let result = f
            .handler
            .handle(FinalizePaymentCommand {
                session_id: f.session_id.clone(),
            })
            .await;
        assert!(matches!(result, Err(PaymentFlowError::InvalidState { .. })));

        // No access leaked from a failed finalize
        let user = f.users.get(&f.user_id).await.unwrap().unwrap();
        assert!(!user.has_paid);
    }
}
