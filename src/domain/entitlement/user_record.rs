//! User record entity.
//!
//! The slice of identity-service state that entitlement decisions depend on.
//! Created at signup with all flags false and the counter at zero.
//!
//! # Invariants
//!
//! - `is_beta_tester` is set out-of-band by an operator, never by the user
//! - `has_paid` is set only by a confirmed payment session
//! - `free_reflections_used` is monotonically non-decreasing, and is never
//!   consulted once either flag is true

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// A user's entitlement-relevant state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque identity-service id.
    pub id: UserId,

    /// User's email address.
    pub email: String,

    /// Unconditional access flag, granted by an operator.
    pub is_beta_tester: bool,

    /// Full access unlocked by a confirmed payment.
    pub has_paid: bool,

    /// Number of free-tier reflections consumed.
    pub free_reflections_used: u32,

    /// When the account was created.
    pub created_at: Timestamp,
}

impl UserRecord {
    /// Creates a fresh record as the identity service does at signup.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            is_beta_tester: false,
            has_paid: false,
            free_reflections_used: 0,
            created_at: Timestamp::now(),
        }
    }

    /// True if the free-tier counter is meaningful for this user.
    ///
    /// Paid and beta users have unlimited access; their counter is never
    /// read or written.
    pub fn counts_free_usage(&self) -> bool {
        !self.has_paid && !self.is_beta_tester
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_has_no_entitlements() {
        let record = UserRecord::new(UserId::generate(), "a@example.com");
        assert!(!record.is_beta_tester);
        assert!(!record.has_paid);
        assert_eq!(record.free_reflections_used, 0);
    }

    #[test]
    fn paid_and_beta_users_do_not_count_usage() {
        let mut record = UserRecord::new(UserId::generate(), "a@example.com");
        assert!(record.counts_free_usage());

        record.has_paid = true;
        assert!(!record.counts_free_usage());

        record.has_paid = false;
        record.is_beta_tester = true;
        assert!(!record.counts_free_usage());
    }
}
