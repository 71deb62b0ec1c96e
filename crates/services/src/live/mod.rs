//! Live game-show sessions.

mod runner;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use catalog::{CatalogError, QuizBankRepository};
use course_core::model::WeekId;

use crate::error::LiveSessionError;

pub use runner::LiveSessionRunner;

/// Default pause on the "get ready" screen.
pub const DEFAULT_GET_READY: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveConfig {
    pub get_ready: Duration,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            get_ready: DEFAULT_GET_READY,
        }
    }
}

impl LiveConfig {
    /// Reads `COURSE_GET_READY_SECS`; unset or unparsable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let get_ready = env::var("COURSE_GET_READY_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map_or(DEFAULT_GET_READY, Duration::from_secs);
        Self { get_ready }
    }
}

/// A live quiz as listed on the session selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveQuizSummary {
    pub week_id: WeekId,
    pub title: String,
    pub question_count: usize,
    pub is_locked: bool,
}

/// Lists live quizzes and opens runners for them.
#[derive(Clone)]
pub struct LiveSessionService {
    quizzes: Arc<dyn QuizBankRepository>,
    config: LiveConfig,
}

impl LiveSessionService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizBankRepository>, config: LiveConfig) -> Self {
        Self { quizzes, config }
    }

    #[must_use]
    pub fn config(&self) -> LiveConfig {
        self.config
    }

    /// # Errors
    ///
    /// Returns `LiveSessionError::Catalog` if the quizzes cannot be read.
    pub async fn list(&self) -> Result<Vec<LiveQuizSummary>, LiveSessionError> {
        Ok(self
            .quizzes
            .live_quizzes()
            .await?
            .into_iter()
            .map(|quiz| LiveQuizSummary {
                week_id: quiz.week_id,
                question_count: quiz.question_count(),
                title: quiz.title,
                is_locked: quiz.is_locked,
            })
            .collect())
    }

    /// Open the live quiz for a week in the lobby.
    ///
    /// # Errors
    ///
    /// Returns `LiveSessionError::UnknownQuiz` when the week has no quiz, or
    /// `QuizLocked` when it is not yet available.
    pub async fn open(&self, week: WeekId) -> Result<LiveSessionRunner, LiveSessionError> {
        let quiz = match self.quizzes.live_quiz(week).await {
            Ok(quiz) => quiz,
            Err(CatalogError::NotFound) => return Err(LiveSessionError::UnknownQuiz(week.value())),
            Err(err) => return Err(err.into()),
        };
        LiveSessionRunner::new(quiz, self.config.get_ready)
    }
}
