//! Shared error types for the services crate.

use thiserror::Error;

use catalog::CatalogError;
use course_core::PreconditionError;
use course_core::model::LevelNumber;

/// Errors emitted by `TutorService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("the tutor is not configured")]
    Disabled,
    #[error("message is empty")]
    BlankMessage,
    #[error("the tutor returned an empty response")]
    EmptyResponse,
    #[error("tutor request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("failed to encode course context: {0}")]
    Context(#[from] serde_json::Error),
}

/// Errors emitted by the tiered quiz, flashcard and concept services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyError {
    #[error("level {level} is still in progress")]
    AttemptUnfinished { level: LevelNumber },
    #[error("no dimension with id `{id}`")]
    UnknownDimension { id: String },
    #[error("unknown flashcard deck `{0}`")]
    UnknownDeck(String),
    #[error("study state is unavailable: {0}")]
    Poisoned(String),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("the course schedule is empty")]
    EmptySchedule,
    #[error("week {0} is not on the schedule")]
    UnknownWeek(u32),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors emitted by live session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LiveSessionError {
    #[error("week {0} has no live quiz")]
    UnknownQuiz(u32),
    #[error("live sessions need a Tokio runtime")]
    NoRuntime,
    #[error("live session state is unavailable: {0}")]
    Poisoned(String),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors emitted by `ProjectAssistant`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProjectError {
    #[error("`{0}` is not on the approved country list")]
    UnapprovedCountry(String),
    #[error("describe a focus before generating an outline")]
    BlankInterest,
    #[error("`{operation}` is not available on the {step} step")]
    WrongStep {
        operation: &'static str,
        step: &'static str,
    },
}

/// Errors emitted by `GroupGenerator`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GroupError {
    #[error("the roster is empty")]
    EmptyRoster,
    #[error("group size must be at least one")]
    ZeroSize,
    #[error("group count must be at least one")]
    ZeroCount,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Tutor(#[from] TutorError),
}
