//! CheckAccessHandler - Query handler for evaluating a user's entitlement.

use std::sync::Arc;

use crate::domain::entitlement::{evaluate, AccessDecision, EntitlementError};
use crate::domain::foundation::UserId;
use crate::ports::UserStore;

/// Query to check a user's access to the gated reflection action.
#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub user_id: UserId,
}

/// Result of an access check.
#[derive(Debug, Clone)]
pub struct CheckAccessResult {
    /// The evaluated decision.
    pub decision: AccessDecision,
}

/// Handler for checking user access.
///
/// A pure read: safe to call arbitrarily often, never mutates the record.
/// This is the most frequently called query in the subsystem.
pub struct CheckAccessHandler {
    user_store: Arc<dyn UserStore>,
    free_limit: u32,
}

impl CheckAccessHandler {
    pub fn new(user_store: Arc<dyn UserStore>, free_limit: u32) -> Self {
        Self {
            user_store,
            free_limit,
        }
    }

    pub async fn handle(
        &self,
        query: CheckAccessQuery,
    ) -> Result<CheckAccessResult, EntitlementError> {
        let user = self
            .user_store
            .get(&query.user_id)
            .await
            .map_err(|e| EntitlementError::infrastructure(e.to_string()))?
            .ok_or_else(|| EntitlementError::user_not_found(query.user_id.clone()))?;

        Ok(CheckAccessResult {
            decision: evaluate(&user, self.free_limit),
        })
    }
}
