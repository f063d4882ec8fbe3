//! User store port - interface to the identity service's user records.
//!
//! # Design
//!
//! The counter increment is specified as a single atomic read-modify-write
//! against the backing store. Two devices or tabs racing on the same user
//! must not lose an update, so implementations must never read a record,
//! mutate it in client-held state, and write it back as separate steps.

use async_trait::async_trait;

use crate::domain::entitlement::UserRecord;
use crate::domain::foundation::{DomainError, UserId};

/// Port for reading and mutating user entitlement state.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetches the user record, or `None` if unknown.
    async fn get(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError>;

    /// Atomically increments `free_reflections_used` by exactly one and
    /// returns the updated record.
    ///
    /// Implementations must perform the increment as one atomic operation
    /// (e.g. a `$inc`-style update or a single lock-held mutation).
    ///
    /// Callers are responsible for skipping paid/beta users; the store does
    /// not re-check the flags.
    async fn increment_free_usage(&self, user_id: &UserId) -> Result<UserRecord, DomainError>;

    /// Sets `has_paid = true` for the user. Idempotent.
    async fn grant_paid_access(&self, user_id: &UserId) -> Result<UserRecord, DomainError>;
}
