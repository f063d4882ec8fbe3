//! Reflection submission value object.
//!
//! A submission is ephemeral: it exists to produce an interpretation and,
//! for free-tier users, to trigger a single usage-counter increment.
//! Persistence of reflection history is an external concern.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::Band;

/// Number of questions in a reflection.
pub const ANSWER_COUNT: usize = 10;

/// Maximum value of a single answer.
pub const MAX_ANSWER: u8 = 3;

/// Maximum possible total score (10 answers x 3).
pub const MAX_TOTAL_SCORE: u8 = (ANSWER_COUNT as u8) * MAX_ANSWER;

/// A completed reflection: ten answers, each in 0..=3.
///
/// Construction validates the answer set, so a `ReflectionSubmission`
/// always carries a total score in [0, 30].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionSubmission {
    answers: [u8; ANSWER_COUNT],
}

impl ReflectionSubmission {
    /// Validates and wraps a set of answers.
    ///
    /// # Errors
    ///
    /// - `WrongLength` if not exactly ten answers were given
    /// - `OutOfRange` if any answer is outside 0..=3
    pub fn new(answers: &[u8]) -> Result<Self, ValidationError> {
        if answers.len() != ANSWER_COUNT {
            return Err(ValidationError::wrong_length(
                "answers",
                ANSWER_COUNT,
                answers.len(),
            ));
        }

        for &answer in answers {
            if answer > MAX_ANSWER {
                return Err(ValidationError::out_of_range(
                    "answer",
                    0,
                    MAX_ANSWER as i32,
                    answer as i32,
                ));
            }
        }

        let mut fixed = [0u8; ANSWER_COUNT];
        fixed.copy_from_slice(answers);
        Ok(Self { answers: fixed })
    }

    /// The individual answers.
    pub fn answers(&self) -> &[u8; ANSWER_COUNT] {
        &self.answers
    }

    /// Sum of all answers, in [0, 30].
    pub fn total_score(&self) -> u8 {
        self.answers.iter().sum()
    }

    /// Interprets this submission's total score.
    ///
    /// Cannot fail: construction already bounds the score.
    pub fn band(&self) -> Band {
        Band::interpret(self.total_score())
            .expect("validated submission score is always in range")
    }
}
