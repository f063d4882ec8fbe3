//! Reflection submissions and score interpretation.

mod interpretation;
mod submission;

pub use interpretation::Band;
pub use submission::{ReflectionSubmission, ANSWER_COUNT, MAX_ANSWER, MAX_TOTAL_SCORE};
