//! Configuration error types.

use thiserror::Error;

/// Error loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Error from semantic validation of loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(&'static str),

    #[error("Stripe API key must start with 'sk_'")]
    InvalidStripeKey,

    #[error("Stripe webhook secret must start with 'whsec_'")]
    InvalidStripeWebhookSecret,

    #[error("Poller must allow at least one attempt")]
    ZeroPollAttempts,
}
