//! Domain layer: pure types and decision logic, no I/O.

pub mod entitlement;
pub mod foundation;
pub mod payment;
pub mod reflection;
