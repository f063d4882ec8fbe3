//! Payment sessions, packages, and checkout lifecycle.

mod errors;
mod package;
mod session;
mod status;

pub use errors::PaymentFlowError;
pub use package::{PaymentPackage, UNLOCK_FULL_ACCESS};
pub use session::PaymentSession;
pub use status::PaymentStatus;
