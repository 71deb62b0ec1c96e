use async_trait::async_trait;
use course_core::model::{
    Assignment, CourseInfo, Dimension, Flashcard, Level, LevelError, LevelNumber, LiveQuiz,
    QuestionError, Week, WeekId,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::records::CourseContent;

/// Course content bundled into the binary.
const BUNDLED_COURSE: &str = include_str!("../data/course.json");

/// Errors surfaced by catalog adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("not found")]
    NotFound,

    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error("assignment weights total {total}, expected 100")]
    WeightTotal { total: u32 },

    #[error("invalid content: {0}")]
    Invalid(String),
}

/// Read-only access to the syllabus tables.
#[async_trait]
pub trait SyllabusRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be read.
    async fn course_info(&self) -> Result<CourseInfo, CatalogError>;

    /// Weeks in calendar order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be read.
    async fn schedule(&self) -> Result<Vec<Week>, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown week.
    async fn week(&self, id: WeekId) -> Result<Week, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be read.
    async fn assignments(&self) -> Result<Vec<Assignment>, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be read.
    async fn dimensions(&self) -> Result<Vec<Dimension>, CatalogError>;

    /// Countries a term project may cover.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be read.
    async fn approved_countries(&self) -> Result<Vec<String>, CatalogError>;
}

/// Read-only access to quiz and flashcard content.
#[async_trait]
pub trait QuizBankRepository: Send + Sync {
    /// Self-paced levels ordered by number.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be read.
    async fn levels(&self) -> Result<Vec<Level>, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown level.
    async fn level(&self, number: LevelNumber) -> Result<Level, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be read.
    async fn live_quizzes(&self) -> Result<Vec<LiveQuiz>, CatalogError>;

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` when the week has no live quiz.
    async fn live_quiz(&self, week: WeekId) -> Result<LiveQuiz, CatalogError>;

    /// Authored concept cards, not including cards derived from dimensions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the backend cannot be read.
    async fn concept_flashcards(&self) -> Result<Vec<Flashcard>, CatalogError>;
}

/// Catalog backed by a validated document held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    content: Arc<CourseContent>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(content: CourseContent) -> Self {
        Self {
            content: Arc::new(content),
        }
    }

    /// # Errors
    ///
    /// Returns `CatalogError` for malformed or invalid content.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        CourseContent::from_json(raw).map(Self::new)
    }

    /// Load a content document from disk.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or a parse or
    /// validation error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), "loaded course content");
        Ok(catalog)
    }

    /// Content shipped with the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled document fails validation.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_COURSE)
    }

    #[must_use]
    pub fn content(&self) -> &CourseContent {
        &self.content
    }
}

#[async_trait]
impl SyllabusRepository for InMemoryCatalog {
    async fn course_info(&self) -> Result<CourseInfo, CatalogError> {
        Ok(self.content.course.clone())
    }

    async fn schedule(&self) -> Result<Vec<Week>, CatalogError> {
        Ok(self.content.schedule.clone())
    }

    async fn week(&self, id: WeekId) -> Result<Week, CatalogError> {
        self.content
            .schedule
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn assignments(&self) -> Result<Vec<Assignment>, CatalogError> {
        Ok(self.content.assignments.clone())
    }

    async fn dimensions(&self) -> Result<Vec<Dimension>, CatalogError> {
        Ok(self.content.dimensions.clone())
    }

    async fn approved_countries(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.content.approved_countries.clone())
    }
}

#[async_trait]
impl QuizBankRepository for InMemoryCatalog {
    async fn levels(&self) -> Result<Vec<Level>, CatalogError> {
        Ok(self.content.levels.clone())
    }

    async fn level(&self, number: LevelNumber) -> Result<Level, CatalogError> {
        self.content
            .levels
            .iter()
            .find(|l| l.number() == number)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn live_quizzes(&self) -> Result<Vec<LiveQuiz>, CatalogError> {
        Ok(self.content.live_quizzes.clone())
    }

    async fn live_quiz(&self, week: WeekId) -> Result<LiveQuiz, CatalogError> {
        self.content
            .live_quizzes
            .iter()
            .find(|q| q.week_id == week)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn concept_flashcards(&self) -> Result<Vec<Flashcard>, CatalogError> {
        Ok(self.content.flashcards.clone())
    }
}

/// Aggregates the syllabus and quiz bank behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Catalog {
    pub syllabus: Arc<dyn SyllabusRepository>,
    pub quizzes: Arc<dyn QuizBankRepository>,
}

impl Catalog {
    #[must_use]
    pub fn from_in_memory(catalog: InMemoryCatalog) -> Self {
        let syllabus: Arc<dyn SyllabusRepository> = Arc::new(catalog.clone());
        let quizzes: Arc<dyn QuizBankRepository> = Arc::new(catalog);
        Self { syllabus, quizzes }
    }

    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled document fails validation.
    pub fn bundled() -> Result<Self, CatalogError> {
        InMemoryCatalog::bundled().map(Self::from_in_memory)
    }
}
