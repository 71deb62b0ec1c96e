use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use catalog::QuizBankRepository;
use course_core::PreconditionError;
use course_core::model::{Level, LevelNumber};
use course_core::session::{QuizSession, SessionResult};
use course_core::unlock::UnlockTracker;

use crate::error::StudyError;

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// A level as shown on the level picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSummary {
    pub number: LevelNumber,
    pub title: String,
    pub description: String,
    pub question_count: usize,
    pub min_score_to_unlock: u8,
    pub unlocked: bool,
    pub is_final: bool,
}

/// Outcome of a finished level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelResult {
    pub level: LevelNumber,
    pub result: SessionResult,
    pub passed: bool,
    /// Level that became selectable because of this attempt.
    pub unlocked_next: Option<LevelNumber>,
    pub is_final: bool,
}

impl LevelResult {
    #[must_use]
    pub fn percent(&self) -> u8 {
        self.result.percent
    }
}

/// A level being played. Drive it through `session_mut`, then hand it back
/// to `TieredQuizService::finish`.
#[derive(Debug, Clone)]
pub struct LevelAttempt {
    level: Level,
    session: QuizSession,
}

impl LevelAttempt {
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut QuizSession {
        &mut self.session
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Level picker and unlock bookkeeping for the self-paced quiz.
///
/// Unlock progress lives only as long as the service.
pub struct TieredQuizService {
    levels: Vec<Level>,
    tracker: Mutex<UnlockTracker>,
}

impl TieredQuizService {
    #[must_use]
    pub fn new(levels: Vec<Level>) -> Self {
        let tracker = UnlockTracker::new(&levels);
        Self {
            levels,
            tracker: Mutex::new(tracker),
        }
    }

    /// Load levels from the quiz bank.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Catalog` if the levels cannot be read.
    pub async fn load(quizzes: Arc<dyn QuizBankRepository>) -> Result<Self, StudyError> {
        let levels = quizzes.levels().await?;
        tracing::debug!(count = levels.len(), "loaded quiz levels");
        Ok(Self::new(levels))
    }

    fn tracker(&self) -> Result<MutexGuard<'_, UnlockTracker>, StudyError> {
        self.tracker
            .lock()
            .map_err(|e| StudyError::Poisoned(e.to_string()))
    }

    fn find(&self, number: LevelNumber) -> Result<&Level, StudyError> {
        self.levels
            .iter()
            .find(|level| level.number() == number)
            .ok_or(StudyError::Precondition(PreconditionError::UnknownLevel {
                level: number,
            }))
    }

    /// Levels in order with their current lock state.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Poisoned` if the unlock state is unavailable.
    pub fn levels(&self) -> Result<Vec<LevelSummary>, StudyError> {
        let tracker = self.tracker()?;
        let final_level = tracker.final_level();
        Ok(self
            .levels
            .iter()
            .map(|level| LevelSummary {
                number: level.number(),
                title: level.title().to_owned(),
                description: level.description().to_owned(),
                question_count: level.questions().len(),
                min_score_to_unlock: level.min_score_to_unlock(),
                unlocked: tracker.is_unlocked(level.number()),
                is_final: final_level == Some(level.number()),
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `StudyError::Poisoned` if the unlock state is unavailable.
    pub fn unlocked(&self) -> Result<BTreeSet<LevelNumber>, StudyError> {
        Ok(self.tracker()?.unlocked().clone())
    }

    /// Begin a fresh attempt at an unlocked level.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` or `LevelLocked` preconditions.
    pub fn start_level(&self, number: LevelNumber) -> Result<LevelAttempt, StudyError> {
        let level = self.find(number)?;
        if !self.tracker()?.is_unlocked(number) {
            return Err(PreconditionError::LevelLocked { level: number }.into());
        }
        let session = QuizSession::new(level.questions().to_vec())?;
        tracing::info!(level = %number, title = level.title(), "level started");
        Ok(LevelAttempt {
            level: level.clone(),
            session,
        })
    }

    /// Score a finished attempt and unlock the next level when it passes.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::AttemptUnfinished` while questions remain, or a
    /// precondition error from the unlock tracker.
    pub fn finish(&self, attempt: &LevelAttempt) -> Result<LevelResult, StudyError> {
        let level = attempt.level.number();
        let result = attempt
            .session
            .result()
            .ok_or(StudyError::AttemptUnfinished { level })?;

        let mut tracker = self.tracker()?;
        let passed = tracker.passed(level, result.percent)?;
        let unlocked_next = tracker.record_completion(level, result.percent)?;
        let is_final = tracker.final_level() == Some(level);

        tracing::info!(
            level = %level,
            percent = result.percent,
            passed,
            unlocked = ?unlocked_next.map(|l| l.value()),
            "level finished"
        );
        Ok(LevelResult {
            level,
            result,
            passed,
            unlocked_next,
            is_final,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{AnswerOption, OptionId, Question, QuestionId};
    use course_core::session::Advance;

    fn level(number: u32, questions: usize, threshold: u8) -> Level {
        let questions = (0..questions)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{number}-{i}")),
                    "Which model?",
                    vec![
                        AnswerOption::new("a", "Westminster", true),
                        AnswerOption::new("b", "Consensus", false),
                    ],
                    "",
                )
                .unwrap()
            })
            .collect();
        Level::new(LevelNumber::new(number), format!("L{number}"), "", threshold, questions).unwrap()
    }

    fn play(attempt: &mut LevelAttempt, correct: usize) {
        let total = attempt.session().total_questions();
        for i in 0..total {
            let pick = if i < correct { "a" } else { "b" };
            attempt.session_mut().answer(&OptionId::new(pick)).unwrap();
            if let Advance::Finished(_) = attempt.session_mut().advance().unwrap() {
                break;
            }
        }
    }

    #[test]
    fn locked_level_cannot_start() {
        let service = TieredQuizService::new(vec![level(1, 5, 70), level(2, 4, 70)]);
        assert!(matches!(
            service.start_level(LevelNumber::new(2)),
            Err(StudyError::Precondition(PreconditionError::LevelLocked { .. }))
        ));
        assert!(matches!(
            service.start_level(LevelNumber::new(7)),
            Err(StudyError::Precondition(PreconditionError::UnknownLevel { .. }))
        ));
    }

    #[test]
    fn unfinished_attempt_is_rejected() {
        let service = TieredQuizService::new(vec![level(1, 2, 70)]);
        let attempt = service.start_level(LevelNumber::FIRST).unwrap();
        assert!(matches!(
            service.finish(&attempt),
            Err(StudyError::AttemptUnfinished { .. })
        ));
    }

    #[test]
    fn passing_unlocks_next_and_summary_reflects_it() {
        let service = TieredQuizService::new(vec![level(1, 5, 70), level(2, 4, 70)]);

        let mut attempt = service.start_level(LevelNumber::FIRST).unwrap();
        play(&mut attempt, 3);
        let result = service.finish(&attempt).unwrap();
        assert_eq!(result.percent(), 60);
        assert!(!result.passed);
        assert_eq!(result.unlocked_next, None);

        let mut retry = service.start_level(LevelNumber::FIRST).unwrap();
        play(&mut retry, 4);
        let result = service.finish(&retry).unwrap();
        assert_eq!(result.percent(), 80);
        assert_eq!(result.unlocked_next, Some(LevelNumber::new(2)));

        let summaries = service.levels().unwrap();
        assert!(summaries.iter().all(|s| s.unlocked));
        assert!(summaries[1].is_final);
    }
}
