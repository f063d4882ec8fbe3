//! Payment handlers: checkout, confirmation, and webhooks.

mod check_status;
mod confirmation_poller;
mod finalize_payment;
mod handle_webhook;
mod start_checkout;

pub use check_status::{
    CheckPaymentStatusHandler, CheckPaymentStatusQuery, CheckPaymentStatusResult,
};
pub use confirmation_poller::{ConfirmationPoller, PollOutcome};
pub use finalize_payment::{FinalizePaymentCommand, FinalizePaymentHandler, FinalizePaymentResult};
pub use handle_webhook::{HandleWebhookCommand, HandleWebhookHandler, WebhookOutcome};
pub use start_checkout::{StartCheckoutCommand, StartCheckoutHandler, StartCheckoutResult};
