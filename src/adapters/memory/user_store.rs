//! In-memory user store for tests and development wiring.
//!
//! The counter increment happens inside a single lock acquisition, so it is
//! a true atomic read-modify-write: concurrent increments for the same user
//! serialize on the lock and none are lost.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::entitlement::UserRecord;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserStore;

/// In-memory `UserStore` backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given records.
    pub fn with_users(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let store = Self::new();
        {
            let mut users = store.users.lock().unwrap();
            for record in records {
                users.insert(record.id.clone(), record);
            }
        }
        store
    }

    /// Inserts or replaces a record.
    pub fn put(&self, record: UserRecord) {
        self.users.lock().unwrap().insert(record.id.clone(), record);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn increment_free_usage(&self, user_id: &UserId) -> Result<UserRecord, DomainError> {
        let mut users = self.users.lock().unwrap();
        let record = users.get_mut(user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", user_id))
        })?;
        record.free_reflections_used += 1;
        Ok(record.clone())
    }

    async fn grant_paid_access(&self, user_id: &UserId) -> Result<UserRecord, DomainError> {
        let mut users = self.users.lock().unwrap();
        let record = users.get_mut(user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", user_id))
        })?;
        record.has_paid = true;
        Ok(record.clone())
    }
}
