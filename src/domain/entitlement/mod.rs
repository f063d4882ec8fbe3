//! User records and access evaluation.

mod errors;
mod evaluator;
mod user_record;

pub use errors::EntitlementError;
pub use evaluator::{evaluate, AccessDecision, DEFAULT_FREE_LIMIT};
pub use user_record::UserRecord;
