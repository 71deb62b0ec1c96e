//! Serialized shape of the course content tables.
//!
//! Records mirror the bundled JSON. `CourseContent::from_records` validates
//! them into domain types so the rest of the workspace never sees raw rows.

use serde::Deserialize;
use std::collections::BTreeSet;

use course_core::model::{
    AnswerOption, Assignment, CourseInfo, Dimension, Flashcard, Level, LevelNumber, LiveQuiz,
    OptionColor, Question, QuestionId, Week, WeekId,
};

use crate::repository::CatalogError;

/// Self-paced question: plain option strings plus the text of the right one.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelQuestionRecord {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl LevelQuestionRecord {
    /// Option ids are assigned `a`, `b`, `c`, … in display order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Question` when the options do not contain the
    /// correct answer exactly once.
    pub fn into_question(self) -> Result<Question, CatalogError> {
        let options = self
            .options
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let is_correct = text == self.correct_answer;
                AnswerOption::new(option_letter(i), text, is_correct)
            })
            .collect();
        Ok(Question::new(
            QuestionId::new(self.id),
            self.question,
            options,
            self.explanation,
        )?)
    }
}

fn option_letter(index: usize) -> String {
    let letters = ('a'..='z').collect::<Vec<_>>();
    match letters.get(index) {
        Some(letter) => letter.to_string(),
        None => format!("o{index}"),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelRecord {
    pub level: u32,
    pub title: String,
    pub description: String,
    pub min_score_to_unlock: u8,
    pub questions: Vec<LevelQuestionRecord>,
}

impl LevelRecord {
    /// # Errors
    ///
    /// Returns `CatalogError` if any question or the level itself is invalid.
    pub fn into_level(self) -> Result<Level, CatalogError> {
        let questions = self
            .questions
            .into_iter()
            .map(LevelQuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Level::new(
            LevelNumber::new(self.level),
            self.title,
            self.description,
            self.min_score_to_unlock,
            questions,
        )?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveOptionRecord {
    pub id: String,
    pub text: String,
    pub color: OptionColor,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveQuestionRecord {
    pub id: String,
    pub text: String,
    pub time_limit: u32,
    pub explanation: String,
    pub options: Vec<LiveOptionRecord>,
}

impl LiveQuestionRecord {
    /// # Errors
    ///
    /// Returns `CatalogError::Question` for invalid options or a zero time limit.
    pub fn into_question(self) -> Result<Question, CatalogError> {
        let options = self
            .options
            .into_iter()
            .map(|o| AnswerOption::new(o.id, o.text, o.is_correct).with_color(o.color))
            .collect();
        let question = Question::new(QuestionId::new(self.id), self.text, options, self.explanation)?
            .with_time_limit(self.time_limit)?;
        Ok(question)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveQuizRecord {
    pub week_id: u32,
    pub title: String,
    #[serde(default)]
    pub is_locked: bool,
    pub questions: Vec<LiveQuestionRecord>,
}

impl LiveQuizRecord {
    /// # Errors
    ///
    /// Returns `CatalogError` for an empty or invalid question list.
    pub fn into_live_quiz(self) -> Result<LiveQuiz, CatalogError> {
        if self.questions.is_empty() {
            return Err(CatalogError::Invalid(format!(
                "live quiz for week {} has no questions",
                self.week_id
            )));
        }
        let questions = self
            .questions
            .into_iter()
            .map(LiveQuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LiveQuiz {
            week_id: WeekId::new(self.week_id),
            title: self.title,
            questions,
            is_locked: self.is_locked,
        })
    }
}

/// Top-level document.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseRecords {
    pub course: CourseInfo,
    pub schedule: Vec<Week>,
    pub assignments: Vec<Assignment>,
    pub dimensions: Vec<Dimension>,
    pub flashcards: Vec<Flashcard>,
    pub levels: Vec<LevelRecord>,
    #[serde(default)]
    pub live_quizzes: Vec<LiveQuizRecord>,
    pub approved_countries: Vec<String>,
}

/// Validated content tables.
#[derive(Debug, Clone)]
pub struct CourseContent {
    pub course: CourseInfo,
    pub schedule: Vec<Week>,
    pub assignments: Vec<Assignment>,
    pub dimensions: Vec<Dimension>,
    pub flashcards: Vec<Flashcard>,
    pub levels: Vec<Level>,
    pub live_quizzes: Vec<LiveQuiz>,
    pub approved_countries: Vec<String>,
}

impl CourseContent {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or a validation error.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let records: CourseRecords = serde_json::from_str(raw)?;
        Self::from_records(records)
    }

    /// # Errors
    ///
    /// Returns `CatalogError` when grade weights do not total 100, weeks or
    /// live quiz weeks repeat, levels are not numbered 1..=n, or any question
    /// is invalid.
    pub fn from_records(records: CourseRecords) -> Result<Self, CatalogError> {
        let total: u32 = records.assignments.iter().map(|a| u32::from(a.weight)).sum();
        if total != 100 {
            return Err(CatalogError::WeightTotal { total });
        }

        let mut weeks = BTreeSet::new();
        for week in &records.schedule {
            if !weeks.insert(week.id) {
                return Err(CatalogError::Invalid(format!("week {} appears twice", week.id)));
            }
        }

        let mut levels = records
            .levels
            .into_iter()
            .map(LevelRecord::into_level)
            .collect::<Result<Vec<_>, _>>()?;
        levels.sort_by_key(Level::number);
        for (expected, level) in (1..).zip(&levels) {
            if level.number().value() != expected {
                return Err(CatalogError::Invalid(format!(
                    "levels must be numbered 1, 2, 3… without gaps; found {} where {expected} belongs",
                    level.number()
                )));
            }
        }

        let live_quizzes = records
            .live_quizzes
            .into_iter()
            .map(LiveQuizRecord::into_live_quiz)
            .collect::<Result<Vec<_>, _>>()?;
        let mut quiz_weeks = BTreeSet::new();
        for quiz in &live_quizzes {
            if !quiz_weeks.insert(quiz.week_id) {
                return Err(CatalogError::Invalid(format!(
                    "week {} has more than one live quiz",
                    quiz.week_id
                )));
            }
        }

        Ok(Self {
            course: records.course,
            schedule: records.schedule,
            assignments: records.assignments,
            dimensions: records.dimensions,
            flashcards: records.flashcards,
            levels,
            live_quizzes,
            approved_countries: records.approved_countries,
        })
    }
}
