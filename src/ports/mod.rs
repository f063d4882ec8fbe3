//! Ports: async trait boundaries to external collaborators.

mod payment_provider;
mod session_repository;
mod user_store;

pub use payment_provider::{
    CheckoutSession, CheckoutStatus, CreateCheckoutRequest, PaymentError, PaymentErrorCode,
    PaymentProvider, WebhookEvent, WebhookEventType,
};
pub use session_repository::PaymentSessionRepository;
pub use user_store::UserStore;
