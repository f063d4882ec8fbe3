//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `MINDSPACE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use mindspace_core::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod entitlement;
mod error;
mod payment;
mod poller;

pub use entitlement::EntitlementConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use poller::PollerConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Entitlement configuration (free-tier allowance)
    #[serde(default)]
    pub entitlement: EntitlementConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Confirmation poller configuration
    #[serde(default)]
    pub poller: PollerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MINDSPACE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `MINDSPACE__ENTITLEMENT__FREE_LIMIT=1`
    /// - `MINDSPACE__PAYMENT__STRIPE_API_KEY=sk_test_...`
    /// - `MINDSPACE__POLLER__MAX_ATTEMPTS=10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MINDSPACE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.payment.validate()?;
        self.poller.validate()?;
        Ok(())
    }
}
