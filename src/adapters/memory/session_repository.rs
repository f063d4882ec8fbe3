//! In-memory payment session repository.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{CheckoutSessionId, DomainError, ErrorCode};
use crate::domain::payment::{PaymentSession, PaymentStatus};
use crate::ports::PaymentSessionRepository;

/// In-memory `PaymentSessionRepository` backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<CheckoutSessionId, PaymentSession>>,
}

impl InMemorySessionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentSessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: PaymentSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&session.id) {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!("Payment session already exists: {}", session.id),
            ));
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<Option<PaymentSession>, DomainError> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn record_status(
        &self,
        session_id: &CheckoutSessionId,
        status: PaymentStatus,
    ) -> Result<PaymentSession, DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(session_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Payment session not found: {}", session_id),
            )
        })?;
        session.record_status(status)?;
        Ok(session.clone())
    }
}
