#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard;
pub mod error;
pub mod groups;
pub mod live;
pub mod project;
pub mod study;
pub mod tutor;

pub use course_core::Clock;

pub use app_services::{AppConfig, AppServices};
pub use dashboard::{CategoryWeight, DashboardOverview, DashboardService, Deadline};
pub use error::{
    AppServicesError, DashboardError, GroupError, LiveSessionError, ProjectError, StudyError,
    TutorError,
};
pub use groups::{GroupGenerator, GroupSizing};
pub use live::{LiveConfig, LiveQuizSummary, LiveSessionRunner, LiveSessionService};
pub use project::{ProjectAssistant, ProjectStep};
pub use study::{
    ConceptExplorer, DeckKind, DimensionGroup, FlashcardService, LevelAttempt, LevelResult,
    LevelSummary, TieredQuizService,
};
pub use tutor::{ChatTurn, Role, TutorConfig, TutorConversation, TutorService};
