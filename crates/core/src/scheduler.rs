use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::model::{CardId, Flashcard, FlashcardProgress, MasteryLevel, ProgressSnapshot};

//
// ─── INTERVALS ─────────────────────────────────────────────────────────────────
//

/// Delays after a "known" answer, indexed by `new_level - 1`, in milliseconds.
///
/// Only the first two slots are ever read: reaching the mastered level uses
/// [`MASTERED_INTERVAL_MS`] instead of the third slot.
// TODO: confirm with product whether mastered cards should use the 7-day slot.
pub const LEARNING_INTERVALS_MS: [i64; 3] = [600_000, 86_400_000, 604_800_000];

/// Flat delay for a card that reaches the mastered level (30 days).
pub const MASTERED_INTERVAL_MS: i64 = 2_592_000_000;

/// Delay until the next review for a card that was just promoted to `level`.
#[must_use]
pub fn review_delay(level: MasteryLevel) -> Duration {
    let millis = match level.value() {
        0 => 0,
        n @ 1..=2 => LEARNING_INTERVALS_MS[usize::from(n) - 1],
        _ => MASTERED_INTERVAL_MS,
    };
    Duration::milliseconds(millis)
}

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// Level-based spaced repetition for flashcards.
///
/// Each "known" answer promotes a card one level (capped at mastered) and pushes
/// its next review out; a single miss drops it back to level 0, due at once.
/// Due checks are made lazily against the `now` passed in.
///
/// # Examples
///
/// ```
/// # use study_core::scheduler::FlashcardScheduler;
/// # use study_core::model::{CardId, ProgressSnapshot};
/// # use study_core::time::fixed_now;
/// let mut progress = ProgressSnapshot::new();
/// let card = CardId::new("fc-1");
///
/// let updated = FlashcardScheduler::mark_known(&card, &mut progress, fixed_now());
/// assert_eq!(updated.level.value(), 1);
/// assert_eq!(updated.next_review - fixed_now(), chrono::Duration::minutes(10));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FlashcardScheduler;

impl FlashcardScheduler {
    /// Give every card without stored progress a fresh entry.
    ///
    /// Returns how many entries were added.
    pub fn initialize(cards: &[Flashcard], progress: &mut ProgressSnapshot) -> usize {
        let mut added = 0;
        for card in cards {
            if !progress.fc_cards.contains_key(&card.id) {
                progress
                    .fc_cards
                    .insert(card.id.clone(), FlashcardProgress::fresh());
                added += 1;
            }
        }
        added
    }

    /// Cards of the selected subjects in review order.
    ///
    /// Due cards come before not-yet-due ones; within each group lower levels
    /// come first. The sort is stable, so content order breaks remaining ties.
    #[must_use]
    pub fn order(
        cards: &[Flashcard],
        progress: &ProgressSnapshot,
        subjects: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Vec<Flashcard> {
        let mut selected: Vec<Flashcard> = cards
            .iter()
            .filter(|card| subjects.contains(&card.subject))
            .cloned()
            .collect();

        selected.sort_by_key(|card| {
            let state = progress.card_progress(&card.id);
            (!state.is_due(now), state.level)
        });
        selected
    }

    /// Promote a card one level and schedule its next review.
    pub fn mark_known(
        card_id: &CardId,
        progress: &mut ProgressSnapshot,
        now: DateTime<Utc>,
    ) -> FlashcardProgress {
        let level = progress.card_progress(card_id).level.promoted();
        let updated = FlashcardProgress {
            level,
            next_review: now + review_delay(level),
        };
        progress.fc_cards.insert(card_id.clone(), updated);
        updated
    }

    /// Reset a card to level 0, due immediately.
    pub fn mark_unknown(card_id: &CardId, progress: &mut ProgressSnapshot) -> FlashcardProgress {
        let reset = FlashcardProgress::fresh();
        progress.fc_cards.insert(card_id.clone(), reset);
        reset
    }

    /// Number of cards at the mastered level.
    #[must_use]
    pub fn known_count(progress: &ProgressSnapshot) -> usize {
        progress
            .fc_cards
            .values()
            .filter(|state| state.level.is_mastered())
            .count()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
