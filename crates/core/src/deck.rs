use chrono::{DateTime, Utc};

use crate::model::{CardId, Flashcard, LevelLabel, ProgressSnapshot};
use crate::scheduler::FlashcardScheduler;

/// Read-only view of the card under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub card: Flashcard,
    /// 1-based position in the deck.
    pub position: usize,
    pub total: usize,
    pub flipped: bool,
    pub label: LevelLabel,
}

/// A circular review deck.
///
/// Every grading action (or a skip) moves to the next card and wraps to the
/// start after the last one; the deck never ends on its own. Actions on an
/// empty deck do nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
}

impl FlashcardDeck {
    #[must_use]
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            index: 0,
            flipped: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in review order.
    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    #[must_use]
    pub fn view(&self, progress: &ProgressSnapshot) -> Option<CardView> {
        let card = self.current()?;
        Some(CardView {
            card: card.clone(),
            position: self.index + 1,
            total: self.cards.len(),
            flipped: self.flipped,
            label: progress.card_progress(&card.id).level.label(),
        })
    }

    /// Toggle between front and back.
    pub fn flip(&mut self) {
        if !self.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    /// Mark the current card as known, then advance.
    ///
    /// Returns the id of the graded card.
    pub fn know(&mut self, progress: &mut ProgressSnapshot, now: DateTime<Utc>) -> Option<CardId> {
        let id = self.current()?.id.clone();
        FlashcardScheduler::mark_known(&id, progress, now);
        self.advance();
        Some(id)
    }

    /// Mark the current card as unknown, then advance.
    pub fn dont_know(&mut self, progress: &mut ProgressSnapshot) -> Option<CardId> {
        let id = self.current()?.id.clone();
        FlashcardScheduler::mark_unknown(&id, progress);
        self.advance();
        Some(id)
    }

    /// Advance without touching progress.
    pub fn skip(&mut self) -> Option<CardId> {
        let id = self.current()?.id.clone();
        self.advance();
        Some(id)
    }

    fn advance(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.cards.len();
        self.flipped = false;
    }
}
