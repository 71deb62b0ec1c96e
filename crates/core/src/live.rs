use std::fmt;

use crate::error::PreconditionError;
use crate::model::{AnswerOption, LiveQuiz, OptionId, Question, WeekId};
use crate::session::{Advance, AnswerOutcome, QuizSession, SessionResult, SessionState};

//
// ─── STAGE ─────────────────────────────────────────────────────────────────────
//

/// Screen currently shown by the live game-show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveStage {
    Lobby,
    GetReady,
    Question { remaining_secs: u32 },
    VotingClosed,
    Results,
    Summary,
}

impl LiveStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LiveStage::Lobby => "in the lobby",
            LiveStage::GetReady => "getting ready",
            LiveStage::Question { .. } => "a question is open",
            LiveStage::VotingClosed => "voting is closed",
            LiveStage::Results => "showing results",
            LiveStage::Summary => "the session is over",
        }
    }
}

impl fmt::Display for LiveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Lobby,
    GetReady,
    Playing,
}

/// Presentation-facing view of a live session at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSnapshot {
    pub week_id: WeekId,
    pub title: String,
    pub stage: LiveStage,
    pub question_index: usize,
    pub total_questions: usize,
    pub question: Option<Question>,
    pub score: usize,
    /// Populated once the answer is on screen.
    pub correct_option: Option<AnswerOption>,
    pub selected: Option<OptionId>,
    pub result: Option<SessionResult>,
}

//
// ─── LIVE SESSION ──────────────────────────────────────────────────────────────
//

/// Game-show wrapper around a timed `QuizSession`.
///
/// Time only moves through `tick`, one call per elapsed second; whoever owns
/// the instance decides how ticks are scheduled.
#[derive(Debug, Clone)]
pub struct LiveSession {
    week_id: WeekId,
    title: String,
    session: QuizSession,
    screen: Screen,
    remaining_secs: u32,
}

impl LiveSession {
    /// Open a quiz in the lobby.
    ///
    /// # Errors
    ///
    /// Returns `QuizLocked` for a locked quiz, `EmptySession` for a quiz
    /// without questions, or `UntimedQuestion` if any question lacks a countdown.
    pub fn new(quiz: LiveQuiz) -> Result<Self, PreconditionError> {
        if quiz.is_locked {
            return Err(PreconditionError::QuizLocked { week: quiz.week_id });
        }
        if quiz.questions.iter().any(|q| q.time_limit_secs().is_none()) {
            return Err(PreconditionError::UntimedQuestion);
        }
        let session = QuizSession::new(quiz.questions)?;
        Ok(Self {
            week_id: quiz.week_id,
            title: quiz.title,
            session,
            screen: Screen::Lobby,
            remaining_secs: 0,
        })
    }

    #[must_use]
    pub fn week_id(&self) -> WeekId {
        self.week_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn stage(&self) -> LiveStage {
        match self.screen {
            Screen::Lobby => LiveStage::Lobby,
            Screen::GetReady => LiveStage::GetReady,
            Screen::Playing => match self.session.state() {
                SessionState::Presenting => LiveStage::Question {
                    remaining_secs: self.remaining_secs,
                },
                SessionState::Locked => LiveStage::VotingClosed,
                SessionState::Answered => LiveStage::Results,
                SessionState::Finished => LiveStage::Summary,
            },
        }
    }

    /// Seconds left on the open question; zero outside `Question`.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        match self.stage() {
            LiveStage::Question { remaining_secs } => remaining_secs,
            _ => 0,
        }
    }

    fn reject(&self, operation: &'static str) -> PreconditionError {
        PreconditionError::invalid_state(operation, self.stage().as_str())
    }

    /// Leave the lobby for the "get ready" screen.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` outside the lobby.
    pub fn launch(&mut self) -> Result<LiveStage, PreconditionError> {
        if self.screen != Screen::Lobby {
            return Err(self.reject("launch"));
        }
        self.screen = Screen::GetReady;
        Ok(self.stage())
    }

    /// Open the current question and start its countdown.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the "get ready" screen is showing.
    pub fn start_question(&mut self) -> Result<LiveStage, PreconditionError> {
        if self.screen != Screen::GetReady {
            return Err(self.reject("start_question"));
        }
        let limit = self
            .session
            .current_question()
            .and_then(Question::time_limit_secs)
            .ok_or(PreconditionError::UntimedQuestion)?;
        self.remaining_secs = limit;
        self.screen = Screen::Playing;
        Ok(self.stage())
    }

    /// One second elapsed on the open question. At zero, voting closes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless a question is open.
    pub fn tick(&mut self) -> Result<LiveStage, PreconditionError> {
        if !matches!(self.stage(), LiveStage::Question { .. }) {
            return Err(self.reject("tick"));
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.session.time_up()?;
        }
        Ok(self.stage())
    }

    /// Record the local answer for the open question.
    ///
    /// Repeating the call on the results screen is ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` outside `Question`/`Results`, or `UnknownOption`.
    pub fn answer(&mut self, option: &OptionId) -> Result<AnswerOutcome, PreconditionError> {
        match self.stage() {
            LiveStage::Question { .. } | LiveStage::Results => {}
            _ => return Err(self.reject("answer")),
        }
        let outcome = self.session.answer(option)?;
        if outcome.accepted {
            self.remaining_secs = 0;
        }
        Ok(outcome)
    }

    /// Presenter shows the answer after voting closed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless voting is closed.
    pub fn reveal(&mut self) -> Result<LiveStage, PreconditionError> {
        if self.stage() != LiveStage::VotingClosed {
            return Err(self.reject("reveal"));
        }
        self.session.reveal()?;
        Ok(self.stage())
    }

    /// Move from results to the next question's "get ready", or to the summary.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless results are showing.
    pub fn next_slide(&mut self) -> Result<LiveStage, PreconditionError> {
        if self.stage() != LiveStage::Results {
            return Err(self.reject("next_slide"));
        }
        match self.session.advance()? {
            Advance::Next { .. } => self.screen = Screen::GetReady,
            Advance::Finished(_) => self.screen = Screen::Playing,
        }
        Ok(self.stage())
    }

    #[must_use]
    pub fn snapshot(&self) -> LiveSnapshot {
        let stage = self.stage();
        let question = self.session.current_question().cloned();
        let revealed = stage == LiveStage::Results;
        LiveSnapshot {
            week_id: self.week_id,
            title: self.title.clone(),
            stage,
            question_index: self.session.current_index(),
            total_questions: self.session.total_questions(),
            correct_option: question
                .as_ref()
                .filter(|_| revealed)
                .map(|q| q.correct_option().clone()),
            selected: self
                .session
                .current_answer()
                .and_then(|record| record.selected.clone()),
            question,
            score: self.session.score(),
            result: self.session.result(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptionColor, QuestionId};

    fn question(id: usize, secs: u32) -> Question {
        Question::new(
            QuestionId::new(format!("l{id}")),
            format!("Live question {id}"),
            vec![
                AnswerOption::new("red", "Majoritarian", true).with_color(OptionColor::Red),
                AnswerOption::new("blue", "Consensus", false).with_color(OptionColor::Blue),
            ],
            "Explained.",
        )
        .unwrap()
        .with_time_limit(secs)
        .unwrap()
    }

    fn quiz(questions: Vec<Question>) -> LiveQuiz {
        LiveQuiz {
            week_id: WeekId::new(2),
            title: "Westminster vs Consensus".into(),
            questions,
            is_locked: false,
        }
    }

    fn running(secs: u32) -> LiveSession {
        let mut live = LiveSession::new(quiz(vec![question(1, secs), question(2, secs)])).unwrap();
        live.launch().unwrap();
        live.start_question().unwrap();
        live
    }

    #[test]
    fn locked_quiz_cannot_start() {
        let mut locked = quiz(vec![question(1, 5)]);
        locked.is_locked = true;
        assert!(matches!(
            LiveSession::new(locked),
            Err(PreconditionError::QuizLocked { .. })
        ));
    }

    #[test]
    fn untimed_question_is_rejected() {
        let untimed = Question::new(
            QuestionId::new("u"),
            "Untimed",
            vec![AnswerOption::new("a", "A", true)],
            "",
        )
        .unwrap();
        assert_eq!(
            LiveSession::new(quiz(vec![untimed])).unwrap_err(),
            PreconditionError::UntimedQuestion
        );
    }

    #[test]
    fn countdown_to_zero_closes_voting_without_score() {
        let mut live = running(3);
        assert_eq!(live.stage(), LiveStage::Question { remaining_secs: 3 });
        live.tick().unwrap();
        live.tick().unwrap();
        assert_eq!(live.tick().unwrap(), LiveStage::VotingClosed);
        assert_eq!(live.session().score(), 0);

        assert!(live.tick().is_err());
        assert!(live.answer(&OptionId::new("red")).is_err());

        assert_eq!(live.reveal().unwrap(), LiveStage::Results);
        let snap = live.snapshot();
        assert_eq!(snap.correct_option.unwrap().id, OptionId::new("red"));
        assert_eq!(snap.selected, None);
        assert_eq!(snap.score, 0);
    }

    #[test]
    fn answer_before_zero_goes_to_results() {
        let mut live = running(10);
        live.tick().unwrap();
        let outcome = live.answer(&OptionId::new("red")).unwrap();
        assert!(outcome.record.is_correct);
        assert_eq!(live.stage(), LiveStage::Results);
        assert_eq!(live.remaining_secs(), 0);
        assert!(live.tick().is_err());

        let again = live.answer(&OptionId::new("blue")).unwrap();
        assert!(!again.accepted);
        assert_eq!(live.session().score(), 1);
    }

    #[test]
    fn full_sequence_reaches_summary() {
        let mut live = running(1);
        live.answer(&OptionId::new("red")).unwrap();
        assert_eq!(live.next_slide().unwrap(), LiveStage::GetReady);
        assert_eq!(live.snapshot().question_index, 1);

        live.start_question().unwrap();
        assert_eq!(live.tick().unwrap(), LiveStage::VotingClosed);
        live.reveal().unwrap();
        assert_eq!(live.next_slide().unwrap(), LiveStage::Summary);

        let snap = live.snapshot();
        assert!(snap.question.is_none());
        let result = snap.result.unwrap();
        assert_eq!((result.score, result.total, result.percent), (1, 2, 50));
        assert!(live.next_slide().is_err());
        assert!(live.launch().is_err());
    }

    #[test]
    fn out_of_order_calls_are_rejected() {
        let mut live = LiveSession::new(quiz(vec![question(1, 5)])).unwrap();
        assert!(live.start_question().is_err());
        assert!(live.reveal().is_err());
        assert!(live.next_slide().is_err());
        assert_eq!(
            live.tick().unwrap_err(),
            PreconditionError::InvalidState {
                operation: "tick",
                state: "in the lobby"
            }
        );
        assert_eq!(live.stage(), LiveStage::Lobby);
    }
}
