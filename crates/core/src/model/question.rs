use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("question {id} repeats option id {option}")]
    DuplicateOption { id: QuestionId, option: OptionId },

    #[error("question {id} must have exactly one correct option, found {found}")]
    CorrectOptionCount { id: QuestionId, found: usize },

    #[error("question {id} has a zero-second time limit")]
    ZeroTimeLimit { id: QuestionId },
}

//
// ─── OPTIONS ───────────────────────────────────────────────────────────────────
//

/// Tile colour used by the live game-show screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionColor {
    Red,
    Blue,
    Yellow,
    Green,
}

impl OptionColor {
    /// Shape drawn next to the tile so colour is never the only cue.
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            OptionColor::Red => '▲',
            OptionColor::Blue => '◆',
            OptionColor::Yellow => '●',
            OptionColor::Green => '■',
        }
    }
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<OptionColor>,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: OptionId::new(id),
            text: text.into(),
            is_correct,
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: OptionColor) -> Self {
        self.color = Some(color);
        self
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz or poll item with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
    explanation: String,
    time_limit_secs: Option<u32>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, there are no options,
    /// option ids repeat, or the number of correct options is not exactly one.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(&option.id) {
                return Err(QuestionError::DuplicateOption {
                    option: option.id.clone(),
                    id,
                });
            }
        }

        let found = options.iter().filter(|o| o.is_correct).count();
        if found != 1 {
            return Err(QuestionError::CorrectOptionCount { id, found });
        }

        Ok(Self {
            id,
            prompt,
            options,
            explanation: explanation.into(),
            time_limit_secs: None,
        })
    }

    /// Attach a countdown for the live variant.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::ZeroTimeLimit` for a zero-second limit.
    pub fn with_time_limit(mut self, secs: u32) -> Result<Self, QuestionError> {
        if secs == 0 {
            return Err(QuestionError::ZeroTimeLimit { id: self.id });
        }
        self.time_limit_secs = Some(secs);
        Ok(self)
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    #[must_use]
    pub fn option(&self, id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    /// The single correct option, guaranteed by construction.
    #[must_use]
    pub fn correct_option(&self) -> &AnswerOption {
        // `new` rejects questions without exactly one correct option.
        self.options
            .iter()
            .find(|o| o.is_correct)
            .unwrap_or(&self.options[0])
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
