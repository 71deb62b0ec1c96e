//! Self-paced study: tiered quizzes, flashcard decks and the concept explorer.

mod concepts;
mod flashcards;
mod levels;

pub use concepts::{ConceptExplorer, DimensionGroup};
pub use flashcards::{DeckKind, FlashcardService};
pub use levels::{LevelAttempt, LevelResult, LevelSummary, TieredQuizService};
