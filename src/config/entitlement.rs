//! Entitlement configuration

use serde::Deserialize;

use crate::domain::entitlement::DEFAULT_FREE_LIMIT;

/// Entitlement configuration (free-tier allowance)
#[derive(Debug, Clone, Deserialize)]
pub struct EntitlementConfig {
    /// Number of free reflections before payment is required.
    #[serde(default = "default_free_limit")]
    pub free_limit: u32,
}

fn default_free_limit() -> u32 {
    DEFAULT_FREE_LIMIT
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            free_limit: DEFAULT_FREE_LIMIT,
        }
    }
}
