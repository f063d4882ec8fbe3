//! Score interpretation bands.
//!
//! Maps a completed reflection's total score onto one of three qualitative
//! bands. The bands partition [0, 30] with no gaps or overlaps.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::submission::MAX_TOTAL_SCORE;

/// Qualitative interpretation of a reflection's total score.
///
/// | Score | Band |
/// |-------|------|
/// | 0-9   | LowerActivation |
/// | 10-19 | ModerateActivation |
/// | 20-30 | FrequentActivation |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Lower activation patterns (0-9).
    LowerActivation,

    /// Moderate nervous system activation (10-19).
    ModerateActivation,

    /// Frequent activation patterns (20-30).
    FrequentActivation,
}

impl Band {
    /// Interprets a total score as a band.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` if the score exceeds 30.
    pub fn interpret(total_score: u8) -> Result<Self, ValidationError> {
        match total_score {
            0..=9 => Ok(Band::LowerActivation),
            10..=19 => Ok(Band::ModerateActivation),
            20..=MAX_TOTAL_SCORE => Ok(Band::FrequentActivation),
            out_of_range => Err(ValidationError::out_of_range(
                "total_score",
                0,
                MAX_TOTAL_SCORE as i32,
                out_of_range as i32,
            )),
        }
    }

    /// User-facing title for this band.
    pub fn title(&self) -> &'static str {
        match self {
            Band::LowerActivation => "Lower Activation Patterns",
            Band::ModerateActivation => "Moderate Nervous System Activation",
            Band::FrequentActivation => "Frequent Activation Patterns",
        }
    }
}
