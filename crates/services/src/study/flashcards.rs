use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use catalog::{QuizBankRepository, SyllabusRepository};
use course_core::flashcards::FlashcardPlayer;
use course_core::model::Flashcard;

use crate::error::StudyError;

/// Which flashcard deck to study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckKind {
    /// One card per institutional dimension, generated from the dimension table.
    CoreDimensions,
    /// Authored concept definitions.
    KeyConcepts,
}

impl DeckKind {
    pub const ALL: [DeckKind; 2] = [DeckKind::CoreDimensions, DeckKind::KeyConcepts];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            DeckKind::CoreDimensions => "Core Dimensions",
            DeckKind::KeyConcepts => "Key Concepts",
        }
    }
}

impl fmt::Display for DeckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for DeckKind {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" | "dimensions" => Ok(DeckKind::CoreDimensions),
            "concepts" | "key" => Ok(DeckKind::KeyConcepts),
            other => Err(StudyError::UnknownDeck(other.to_owned())),
        }
    }
}

/// Builds flashcard decks from catalog content.
#[derive(Clone)]
pub struct FlashcardService {
    syllabus: Arc<dyn SyllabusRepository>,
    quizzes: Arc<dyn QuizBankRepository>,
}

impl FlashcardService {
    #[must_use]
    pub fn new(
        syllabus: Arc<dyn SyllabusRepository>,
        quizzes: Arc<dyn QuizBankRepository>,
    ) -> Self {
        Self { syllabus, quizzes }
    }

    /// Cards for a deck, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Catalog` if the content cannot be read.
    pub async fn deck(&self, kind: DeckKind) -> Result<Vec<Flashcard>, StudyError> {
        let cards = match kind {
            DeckKind::CoreDimensions => self
                .syllabus
                .dimensions()
                .await?
                .iter()
                .map(Flashcard::from_dimension)
                .collect(),
            DeckKind::KeyConcepts => self.quizzes.concept_flashcards().await?,
        };
        Ok(cards)
    }

    /// A player positioned on the first card of the deck.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Precondition` for an empty deck.
    pub async fn player(&self, kind: DeckKind) -> Result<FlashcardPlayer, StudyError> {
        let cards = self.deck(kind).await?;
        tracing::debug!(deck = %kind, cards = cards.len(), "flashcard deck opened");
        Ok(FlashcardPlayer::new(cards)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_names_parse() {
        assert_eq!("core".parse::<DeckKind>().unwrap(), DeckKind::CoreDimensions);
        assert_eq!(" Concepts ".parse::<DeckKind>().unwrap(), DeckKind::KeyConcepts);
        assert!(matches!(
            "history".parse::<DeckKind>(),
            Err(StudyError::UnknownDeck(name)) if name == "history"
        ));
    }
}
