use thiserror::Error;

use crate::model::ids::LevelNumber;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level title cannot be empty")]
    EmptyTitle,

    #[error("level {level} has no questions")]
    NoQuestions { level: LevelNumber },

    #[error("level {level} threshold {threshold}% is above 100")]
    ThresholdOutOfRange { level: LevelNumber, threshold: u8 },
}

/// A tiered-quiz level: a question set gated behind the previous level's threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    number: LevelNumber,
    title: String,
    description: String,
    min_score_to_unlock: u8,
    questions: Vec<Question>,
}

impl Level {
    /// Creates a validated level.
    ///
    /// # Errors
    ///
    /// Returns `LevelError` for a blank title, an empty question list, or a
    /// threshold above 100.
    pub fn new(
        number: LevelNumber,
        title: impl Into<String>,
        description: impl Into<String>,
        min_score_to_unlock: u8,
        questions: Vec<Question>,
    ) -> Result<Self, LevelError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LevelError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(LevelError::NoQuestions { level: number });
        }
        if min_score_to_unlock > 100 {
            return Err(LevelError::ThresholdOutOfRange {
                level: number,
                threshold: min_score_to_unlock,
            });
        }

        Ok(Self {
            number,
            title,
            description: description.into(),
            min_score_to_unlock,
            questions,
        })
    }

    #[must_use]
    pub fn number(&self) -> LevelNumber {
        self.number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Percentage that unlocks the following level.
    #[must_use]
    pub fn min_score_to_unlock(&self) -> u8 {
        self.min_score_to_unlock
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
