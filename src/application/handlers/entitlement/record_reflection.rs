//! RecordReflectionHandler - Command handler for a completed reflection.
//!
//! Validates the submission, interprets the score, and consumes one unit of
//! the free allowance for free-tier users. The caller must invoke this
//! exactly once per accepted submission - on acceptance, not on every view
//! of the results screen.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementError, UserRecord};
use crate::domain::foundation::UserId;
use crate::domain::reflection::{Band, ReflectionSubmission};
use crate::ports::UserStore;

/// Command carrying an accepted reflection submission.
#[derive(Debug, Clone)]
pub struct RecordReflectionCommand {
    pub user_id: UserId,
    pub answers: Vec<u8>,
}

/// Result of recording a reflection.
#[derive(Debug, Clone)]
pub struct RecordReflectionResult {
    /// Sum of the answers, in [0, 30].
    pub total_score: u8,

    /// Interpretation band for the score.
    pub band: Band,

    /// The user record after any counter update.
    pub user: UserRecord,
}

/// Handler for recording a completed reflection.
pub struct RecordReflectionHandler {
    user_store: Arc<dyn UserStore>,
}

impl RecordReflectionHandler {
    pub fn new(user_store: Arc<dyn UserStore>) -> Self {
        Self { user_store }
    }

    pub async fn handle(
        &self,
        cmd: RecordReflectionCommand,
    ) -> Result<RecordReflectionResult, EntitlementError> {
        // Reject malformed submissions before touching storage
        let submission = ReflectionSubmission::new(&cmd.answers)?;
        let band = submission.band();

        let user = self
            .user_store
            .get(&cmd.user_id)
            .await
            .map_err(|e| EntitlementError::infrastructure(e.to_string()))?
            .ok_or_else(|| EntitlementError::user_not_found(cmd.user_id.clone()))?;

        // Paid and beta users never have their counter touched
        let user = if user.counts_free_usage() {
            let updated = self
                .user_store
                .increment_free_usage(&cmd.user_id)
                .await
                .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
            tracing::info!(
                user_id = %cmd.user_id,
                free_reflections_used = updated.free_reflections_used,
                "Incremented free usage"
            );
            updated
        } else {
            user
        };

        Ok(RecordReflectionResult {
            total_score: submission.total_score(),
            band,
            user,
        })
    }
}
