use crate::error::PreconditionError;
use crate::model::Flashcard;

/// Steps through a deck one card at a time, wrapping at both ends.
#[derive(Debug, Clone)]
pub struct FlashcardPlayer {
    cards: Vec<Flashcard>,
    current: usize,
    flipped: bool,
}

impl FlashcardPlayer {
    /// # Errors
    ///
    /// Returns `PreconditionError::EmptyDeck` when there are no cards.
    pub fn new(cards: Vec<Flashcard>) -> Result<Self, PreconditionError> {
        if cards.is_empty() {
            return Err(PreconditionError::EmptyDeck);
        }
        Ok(Self {
            cards,
            current: 0,
            flipped: false,
        })
    }

    #[must_use]
    pub fn current(&self) -> &Flashcard {
        &self.cards[self.current]
    }

    /// 1-based position and deck size, e.g. "Card 3 of 12".
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.cards.len())
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Text on the visible face.
    #[must_use]
    pub fn visible_face(&self) -> &str {
        let card = self.current();
        if self.flipped { &card.back } else { &card.front }
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn next(&mut self) -> &Flashcard {
        self.flipped = false;
        self.current = (self.current + 1) % self.cards.len();
        self.current()
    }

    pub fn previous(&mut self) -> &Flashcard {
        self.flipped = false;
        self.current = (self.current + self.cards.len() - 1) % self.cards.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlashcardCategory;

    fn card(id: &str) -> Flashcard {
        Flashcard {
            id: id.into(),
            front: format!("{id} front"),
            back: format!("{id} back"),
            category: FlashcardCategory::Concept,
        }
    }

    #[test]
    fn empty_deck_is_rejected() {
        assert_eq!(
            FlashcardPlayer::new(Vec::new()).unwrap_err(),
            PreconditionError::EmptyDeck
        );
    }

    #[test]
    fn wraps_both_ways_and_resets_flip() {
        let mut player = FlashcardPlayer::new(vec![card("c1"), card("c2"), card("c3")]).unwrap();
        assert_eq!(player.position(), (1, 3));

        player.flip();
        assert_eq!(player.visible_face(), "c1 back");

        assert_eq!(player.previous().id, "c3");
        assert!(!player.is_flipped());
        assert_eq!(player.position(), (3, 3));

        assert_eq!(player.next().id, "c1");
        assert_eq!(player.next().id, "c2");
        assert_eq!(player.visible_face(), "c2 front");
    }
}
