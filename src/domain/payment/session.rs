//! Payment session aggregate.
//!
//! One `PaymentSession` per checkout attempt, keyed by the provider-issued
//! session id. Status is only ever advanced by the provider's asynchronous
//! notification or lookup, never by the client.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CheckoutSessionId, DomainError, ErrorCode, StateMachine, Timestamp, UserId,
};

use super::PaymentStatus;

/// Server-side record of a single checkout attempt.
///
/// # Invariants
///
/// - `id` is provider-issued and unique per checkout attempt
/// - `status` is write-once terminal: once settled it never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Provider-issued checkout session id.
    pub id: CheckoutSessionId,

    /// User who initiated the checkout.
    pub user_id: UserId,

    /// Email of the initiating user, carried as checkout metadata.
    pub email: String,

    /// Package being purchased.
    pub package_id: String,

    /// Amount in cents (server-defined, never client-supplied).
    pub amount_cents: i64,

    /// ISO currency code.
    pub currency: String,

    /// Current lifecycle status.
    pub status: PaymentStatus,

    /// When the checkout was created.
    pub created_at: Timestamp,

    /// When the status last changed.
    pub updated_at: Timestamp,
}

impl PaymentSession {
    /// Creates a new pending session at checkout initiation.
    pub fn new(
        id: CheckoutSessionId,
        user_id: UserId,
        email: impl Into<String>,
        package_id: impl Into<String>,
        amount_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            email: email.into(),
            package_id: package_id.into(),
            amount_cents,
            currency: currency.into(),
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a provider-reported status.
    ///
    /// Re-applying the current status is a no-op, so duplicate provider
    /// notifications settle cleanly.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the session is already settled
    /// with a different status.
    pub fn record_status(&mut self, status: PaymentStatus) -> Result<(), DomainError> {
        if self.status == status {
            return Ok(());
        }

        self.status = self.status.transition_to(status).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition payment session from {:?} to {:?}",
                    self.status, status
                ),
            )
            .with_detail("session_id", self.id.to_string())
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// True once the provider has reported a terminal outcome.
    pub fn is_settled(&self) -> bool {
        self.status.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PaymentSession {
        PaymentSession::new(
            CheckoutSessionId::new("cs_test_123").unwrap(),
            UserId::generate(),
            "user@example.com",
            "unlock_full_access",
            100,
            "usd",
        )
    }

    #[test]
    fn new_session_is_pending() {
        let s = session();
        assert_eq!(s.status, PaymentStatus::Pending);
        assert!(!s.is_settled());
    }

    #[test]
    fn pending_session_can_settle_paid() {
        let mut s = session();
        s.record_status(PaymentStatus::Paid).unwrap();
        assert_eq!(s.status, PaymentStatus::Paid);
        assert!(s.is_settled());
    }

    #[test]
    fn reapplying_same_status_is_a_noop() {
        let mut s = session();
        s.record_status(PaymentStatus::Paid).unwrap();
        let before = s.clone();
        s.record_status(PaymentStatus::Paid).unwrap();
        assert_eq!(s.status, before.status);
    }

    #[test]
    fn settled_session_rejects_different_status() {
        let mut s = session();
        s.record_status(PaymentStatus::Expired).unwrap();
        assert!(s.record_status(PaymentStatus::Paid).is_err());
        assert_eq!(s.status, PaymentStatus::Expired);
    }
}
