//! Payment session repository port.

use async_trait::async_trait;

use crate::domain::foundation::{CheckoutSessionId, DomainError};
use crate::domain::payment::{PaymentSession, PaymentStatus};

/// Port for persisting payment session records.
///
/// Implementations must honor the write-once-terminal status invariant:
/// `record_status` on a settled session with a different status fails with
/// `InvalidStateTransition` rather than overwriting the outcome.
#[async_trait]
pub trait PaymentSessionRepository: Send + Sync {
    /// Persists a new pending session. Fails if the id already exists.
    async fn insert(&self, session: PaymentSession) -> Result<(), DomainError>;

    /// Fetches a session by provider id, or `None` if unknown.
    async fn get(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<Option<PaymentSession>, DomainError>;

    /// Applies a provider-reported status and returns the updated session.
    ///
    /// Re-applying the current status is a no-op (duplicate notifications
    /// are expected).
    async fn record_status(
        &self,
        session_id: &CheckoutSessionId,
        status: PaymentStatus,
    ) -> Result<PaymentSession, DomainError>;
}
