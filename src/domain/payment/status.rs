//! Payment session status state machine.
//!
//! A session starts `Pending` and moves to exactly one terminal status.
//! Terminal statuses are write-once: no transition ever leaves them.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Status of a checkout attempt, as reported by the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Checkout created, awaiting the provider's outcome.
    Pending,

    /// Payment completed. Unlocks the owning user's access.
    Paid,

    /// The checkout session expired before payment.
    Expired,

    /// The provider reported a failed payment.
    Failed,
}

impl PaymentStatus {
    /// True for statuses that end the session's lifecycle.
    pub fn is_settled(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Paid) | (Pending, Expired) | (Pending, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Paid, Expired, Failed],
            Paid | Expired | Failed => vec![],
        }
    }
}
