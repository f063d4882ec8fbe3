//! Command and query handlers.
//!
//! Handlers orchestrate domain logic through the ports. They hold no domain
//! rules of their own beyond sequencing and error mapping.

pub mod entitlement;
pub mod payment;
