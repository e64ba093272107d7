use std::collections::BTreeSet;

use study_core::deck::{CardView, FlashcardDeck};
use study_core::model::CardId;
use study_core::scheduler::FlashcardScheduler;

use crate::context::StudyContext;
use crate::quiz::first_appearance;

/// Everything the flashcard screen shows at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardPanel {
    /// `None` when no card matches the selected subjects.
    pub card: Option<CardView>,
    pub known: usize,
    pub total_cards: usize,
}

/// Flashcard review on top of the shared context.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlashcardService;

impl FlashcardService {
    /// Distinct card subjects in the order they first appear.
    #[must_use]
    pub fn subjects(ctx: &StudyContext) -> Vec<String> {
        first_appearance(ctx.content().flashcards.iter().map(|c| c.subject.as_str()))
    }

    /// Deck over the selected subjects, due and low-level cards first.
    #[must_use]
    pub fn build_deck(ctx: &StudyContext, subjects: &BTreeSet<String>) -> FlashcardDeck {
        let now = ctx.clock().now();
        let cards =
            FlashcardScheduler::order(&ctx.content().flashcards, ctx.progress(), subjects, now);
        tracing::debug!(cards = cards.len(), subjects = subjects.len(), "built flashcard deck");
        FlashcardDeck::new(cards)
    }

    #[must_use]
    pub fn panel(ctx: &StudyContext, deck: &FlashcardDeck) -> FlashcardPanel {
        FlashcardPanel {
            card: deck.view(ctx.progress()),
            known: FlashcardScheduler::known_count(ctx.progress()),
            total_cards: ctx.content().flashcards.len(),
        }
    }

    /// Promote the current card, persist, and advance.
    pub async fn know(ctx: &mut StudyContext, deck: &mut FlashcardDeck) -> Option<CardId> {
        let now = ctx.clock().now();
        let id = deck.know(ctx.progress_mut(), now)?;
        let state = ctx.progress().card_progress(&id);
        tracing::debug!(
            card = %id,
            level = state.level.value(),
            next_review = %state.next_review,
            "card known"
        );
        ctx.commit().await;
        Some(id)
    }

    /// Reset the current card to new, persist, and advance.
    pub async fn dont_know(ctx: &mut StudyContext, deck: &mut FlashcardDeck) -> Option<CardId> {
        let id = deck.dont_know(ctx.progress_mut())?;
        tracing::debug!(card = %id, "card reset");
        ctx.commit().await;
        Some(id)
    }

    /// Advance without grading.
    pub fn skip(deck: &mut FlashcardDeck) -> Option<CardId> {
        deck.skip()
    }
}
