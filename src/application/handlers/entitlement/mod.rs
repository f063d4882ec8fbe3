//! Entitlement handlers exposed to the UI layer.

mod check_access;
mod record_reflection;

pub use check_access::{CheckAccessHandler, CheckAccessQuery, CheckAccessResult};
pub use record_reflection::{
    RecordReflectionCommand, RecordReflectionHandler, RecordReflectionResult,
};
