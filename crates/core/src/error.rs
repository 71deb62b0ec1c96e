use thiserror::Error;

use crate::model::{LevelNumber, OptionId, WeekId};

/// Caller-side misuse of a state machine.
///
/// Every operation validates before it mutates, so an `Err` always leaves the
/// machine exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PreconditionError {
    #[error("`{operation}` is not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("option {option} does not belong to the current question")]
    UnknownOption { option: OptionId },

    #[error("current question has no time limit")]
    UntimedQuestion,

    #[error("a session needs at least one question")]
    EmptySession,

    #[error("a flashcard deck needs at least one card")]
    EmptyDeck,

    #[error("level {level} does not exist")]
    UnknownLevel { level: LevelNumber },

    #[error("level {level} has not been unlocked")]
    LevelLocked { level: LevelNumber },

    #[error("score percent {percent} is above 100")]
    PercentOutOfRange { percent: u8 },

    #[error("live quiz for week {week} is locked")]
    QuizLocked { week: WeekId },
}

impl PreconditionError {
    pub(crate) fn invalid_state(operation: &'static str, state: &'static str) -> Self {
        Self::InvalidState { operation, state }
    }
}
