//! Confirmation poller configuration

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Confirmation poller configuration
///
/// Defaults match the client behavior this replaces: a lookup every two
/// seconds, up to ten attempts (~20 seconds worst-case user-visible wait).
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    /// Milliseconds between status lookups.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of lookups before giving up with a timeout.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_interval_ms() -> u64 {
    2_000
}

fn default_max_attempts() -> u32 {
    10
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl PollerConfig {
    /// Interval between lookups as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Validate poller configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::ZeroPollAttempts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_wait_to_twenty_seconds() {
        let config = PollerConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(2));
        assert_eq!(config.max_attempts, 10);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let config = PollerConfig {
            interval_ms: 2_000,
            max_attempts: 0,
        };
        assert_eq!(config.validate(), Err(ValidationError::ZeroPollAttempts));
    }
}
