use std::fmt;

use crate::error::PreconditionError;
use crate::model::{OptionId, Question, QuestionId};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Tag of the player's current state, for presentation and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Question shown, no answer yet.
    Presenting,
    /// An answer (or the reveal of an unanswered question) is on screen.
    Answered,
    /// Countdown elapsed without an answer; waiting for the reveal.
    Locked,
    /// Sequence exhausted. Terminal.
    Finished,
}

impl SessionState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Presenting => "presenting",
            SessionState::Answered => "answered",
            SessionState::Locked => "locked",
            SessionState::Finished => "finished",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened on one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    /// `None` when the countdown ran out before any answer.
    pub selected: Option<OptionId>,
    pub is_correct: bool,
}

/// Result of an `answer` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub record: AnswerRecord,
    /// `false` when the question was already answered and this call was ignored.
    pub accepted: bool,
}

/// Final tally, computed before the session reports `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub score: usize,
    pub total: usize,
    pub percent: u8,
}

impl SessionResult {
    fn new(score: usize, total: usize) -> Self {
        Self {
            score,
            total,
            percent: score_percent(score, total),
        }
    }
}

/// Where `advance` landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Finished(SessionResult),
}

/// `round(100 * score / total)` in integer arithmetic, halves rounding up.
#[must_use]
pub fn score_percent(score: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let score = score.min(total) as u128;
    let total = total as u128;
    let percent = (200 * score + total) / (2 * total);
    u8::try_from(percent).unwrap_or(100)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Presenting,
    Answered(AnswerRecord),
    Locked,
    Finished(SessionResult),
}

impl Phase {
    fn state(&self) -> SessionState {
        match self {
            Phase::Presenting => SessionState::Presenting,
            Phase::Answered(_) => SessionState::Answered,
            Phase::Locked => SessionState::Locked,
            Phase::Finished(_) => SessionState::Finished,
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through an ordered question sequence.
///
/// Steps through questions one at a time: `answer` scores the current question,
/// `advance` moves on. Timed questions can also be closed by `time_up` and then
/// shown with `reveal`, which counts them as wrong.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: usize,
    phase: Phase,
    history: Vec<AnswerRecord>,
}

impl QuizSession {
    /// Start a session on the first question.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::EmptySession` for an empty sequence.
    pub fn new(questions: Vec<Question>) -> Result<Self, PreconditionError> {
        if questions.is_empty() {
            return Err(PreconditionError::EmptySession);
        }
        Ok(Self {
            questions,
            current: 0,
            score: 0,
            phase: Phase::Presenting,
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.phase.state()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question on screen; `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Answer shown for the current question, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        match &self.phase {
            Phase::Answered(record) => Some(record),
            _ => None,
        }
    }

    /// Records of every question already left behind.
    #[must_use]
    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        match self.phase {
            Phase::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// Choose an option for the current question.
    ///
    /// A second call before `advance` is ignored: the first answer wins.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::UnknownOption` if the option is not part of
    /// the current question, or `InvalidState` when locked or finished.
    pub fn answer(&mut self, option: &OptionId) -> Result<AnswerOutcome, PreconditionError> {
        match &self.phase {
            Phase::Presenting => {}
            Phase::Answered(record) => {
                return Ok(AnswerOutcome {
                    record: record.clone(),
                    accepted: false,
                });
            }
            other => {
                return Err(PreconditionError::invalid_state(
                    "answer",
                    other.state().as_str(),
                ));
            }
        }

        let question = &self.questions[self.current];
        let chosen = question
            .option(option)
            .ok_or_else(|| PreconditionError::UnknownOption {
                option: option.clone(),
            })?;

        let record = AnswerRecord {
            question_id: question.id().clone(),
            selected: Some(chosen.id.clone()),
            is_correct: chosen.is_correct,
        };
        if record.is_correct {
            self.score += 1;
        }
        self.phase = Phase::Answered(record.clone());

        Ok(AnswerOutcome {
            record,
            accepted: true,
        })
    }

    /// Close the current timed question without awarding a point.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` outside `Presenting`, or `UntimedQuestion` when the
    /// current question has no countdown.
    pub fn time_up(&mut self) -> Result<(), PreconditionError> {
        if !matches!(self.phase, Phase::Presenting) {
            return Err(PreconditionError::invalid_state(
                "time_up",
                self.state().as_str(),
            ));
        }
        if self.questions[self.current].time_limit_secs().is_none() {
            return Err(PreconditionError::UntimedQuestion);
        }
        self.phase = Phase::Locked;
        Ok(())
    }

    /// Show the correct answer of a locked question.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the question is locked.
    pub fn reveal(&mut self) -> Result<&AnswerRecord, PreconditionError> {
        if !matches!(self.phase, Phase::Locked) {
            return Err(PreconditionError::invalid_state(
                "reveal",
                self.state().as_str(),
            ));
        }
        self.phase = Phase::Answered(AnswerRecord {
            question_id: self.questions[self.current].id().clone(),
            selected: None,
            is_correct: false,
        });
        self.current_answer()
            .ok_or_else(|| PreconditionError::invalid_state("reveal", "answered"))
    }

    /// Move to the next question, or finish and compute the final tally.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the current question has been answered or revealed.
    pub fn advance(&mut self) -> Result<Advance, PreconditionError> {
        let Phase::Answered(record) = &self.phase else {
            return Err(PreconditionError::invalid_state(
                "advance",
                self.state().as_str(),
            ));
        };
        self.history.push(record.clone());

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.phase = Phase::Presenting;
            Ok(Advance::Next {
                index: self.current,
            })
        } else {
            let result = SessionResult::new(self.score, self.questions.len());
            self.phase = Phase::Finished(result);
            Ok(Advance::Finished(result))
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOption;

    fn question(id: usize) -> Question {
        Question::new(
            QuestionId::new(format!("q{id}")),
            format!("Question {id}"),
            vec![
                AnswerOption::new("right", "Right", true),
                AnswerOption::new("wrong", "Wrong", false),
            ],
            "Because.",
        )
        .unwrap()
    }

    fn timed(id: usize) -> Question {
        question(id).with_time_limit(20).unwrap()
    }

    fn session(len: usize) -> QuizSession {
        QuizSession::new((1..=len).map(question).collect()).unwrap()
    }

    fn right() -> OptionId {
        OptionId::new("right")
    }

    fn wrong() -> OptionId {
        OptionId::new("wrong")
    }

    #[test]
    fn empty_session_is_rejected() {
        let err = QuizSession::new(Vec::new()).unwrap_err();
        assert_eq!(err, PreconditionError::EmptySession);
    }

    #[test]
    fn five_questions_three_right_scores_sixty() {
        let mut s = session(5);
        for pick in [right(), right(), right(), wrong(), wrong()] {
            s.answer(&pick).unwrap();
            s.advance().unwrap();
        }
        assert_eq!(s.score(), 3);
        assert_eq!(s.state(), SessionState::Finished);
        assert_eq!(
            s.result(),
            Some(SessionResult {
                score: 3,
                total: 5,
                percent: 60
            })
        );
        assert_eq!(s.history().len(), 5);
    }

    #[test]
    fn final_answer_counts_before_results() {
        let mut s = session(4);
        for pick in [wrong(), right(), right(), right()] {
            s.answer(&pick).unwrap();
            let step = s.advance().unwrap();
            if let Advance::Finished(result) = step {
                assert_eq!(result.score, 3);
                assert_eq!(result.percent, 75);
            }
        }
        assert!(s.is_finished());
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(score_percent(3, 4), 75);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(0, 5), 0);
        assert_eq!(score_percent(5, 5), 100);
    }

    #[test]
    fn second_answer_is_ignored() {
        let mut s = session(2);
        let first = s.answer(&wrong()).unwrap();
        assert!(first.accepted);
        assert_eq!(s.score(), 0);

        let second = s.answer(&right()).unwrap();
        assert!(!second.accepted);
        assert_eq!(second.record.selected, Some(wrong()));
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn advance_before_answer_is_rejected_without_mutation() {
        let mut s = session(2);
        let err = s.advance().unwrap_err();
        assert_eq!(
            err,
            PreconditionError::InvalidState {
                operation: "advance",
                state: "presenting"
            }
        );
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.state(), SessionState::Presenting);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn unknown_option_is_rejected_without_mutation() {
        let mut s = session(1);
        let err = s.answer(&OptionId::new("nope")).unwrap_err();
        assert!(matches!(err, PreconditionError::UnknownOption { .. }));
        assert_eq!(s.state(), SessionState::Presenting);
    }

    #[test]
    fn index_and_score_are_monotonic() {
        let mut s = session(3);
        let mut last_score = 0;
        let mut last_index = 0;
        for pick in [right(), wrong(), right()] {
            s.answer(&pick).unwrap();
            assert!(s.score() >= last_score);
            last_score = s.score();
            if let Advance::Next { index } = s.advance().unwrap() {
                assert_eq!(index, last_index + 1);
                last_index = index;
            }
        }
        assert_eq!(last_index, 2);
    }

    #[test]
    fn finished_is_terminal() {
        let mut s = session(1);
        s.answer(&right()).unwrap();
        s.advance().unwrap();

        assert!(s.current_question().is_none());
        assert!(matches!(
            s.answer(&right()),
            Err(PreconditionError::InvalidState { state: "finished", .. })
        ));
        assert!(s.advance().is_err());
        assert!(s.time_up().is_err());
        assert!(s.reveal().is_err());
    }

    #[test]
    fn timed_question_locks_and_reveals_as_wrong() {
        let mut s = QuizSession::new(vec![timed(1), timed(2)]).unwrap();
        s.time_up().unwrap();
        assert_eq!(s.state(), SessionState::Locked);
        assert!(matches!(
            s.answer(&right()),
            Err(PreconditionError::InvalidState { operation: "answer", .. })
        ));

        let record = s.reveal().unwrap().clone();
        assert_eq!(record.selected, None);
        assert!(!record.is_correct);
        assert_eq!(s.score(), 0);

        assert_eq!(s.advance().unwrap(), Advance::Next { index: 1 });
        s.answer(&right()).unwrap();
        let Advance::Finished(result) = s.advance().unwrap() else {
            panic!("expected finish");
        };
        assert_eq!(result.percent, 50);
    }

    #[test]
    fn time_up_requires_a_timed_question() {
        let mut s = session(1);
        assert_eq!(s.time_up().unwrap_err(), PreconditionError::UntimedQuestion);
        assert_eq!(s.state(), SessionState::Presenting);
    }

    #[test]
    fn reveal_only_from_locked() {
        let mut s = QuizSession::new(vec![timed(1)]).unwrap();
        assert!(s.reveal().is_err());
        s.answer(&right()).unwrap();
        assert!(s.time_up().is_err());
        assert!(s.reveal().is_err());
    }
}
