use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::flashcard::FlashcardProgress;
use crate::model::ids::{CardId, QuestionId};

//
// ─── SOLVED ENTRY ──────────────────────────────────────────────────────────────
//

/// Latest answer recorded for a question, across all sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedEntry {
    pub correct: bool,
    pub count: u32,
    pub last_date: DateTime<Utc>,
    pub selected_answer: u32,
}

/// How a question stands in the user's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnswerStatus {
    Wrong,
    Unsolved,
    Correct,
}

impl AnswerStatus {
    /// Sort key for weak-spot ordering: wrong first, correct last.
    #[must_use]
    pub fn weak_priority(self) -> u8 {
        match self {
            AnswerStatus::Wrong => 0,
            AnswerStatus::Unsolved => 1,
            AnswerStatus::Correct => 2,
        }
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Everything the app persists about the user: the only unit written to storage.
///
/// A missing key means "never touched"; entries are only created by an action
/// on that question or card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub solved: BTreeMap<QuestionId, SolvedEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bookmarks: BTreeSet<QuestionId>,
    #[serde(default, rename = "fcCards", deserialize_with = "null_as_default")]
    pub fc_cards: BTreeMap<CardId, FlashcardProgress>,
}

/// Treats an explicit `null` container like a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn solved_entry(&self, id: &QuestionId) -> Option<&SolvedEntry> {
        self.solved.get(id)
    }

    #[must_use]
    pub fn status(&self, id: &QuestionId) -> AnswerStatus {
        match self.solved.get(id) {
            None => AnswerStatus::Unsolved,
            Some(entry) if entry.correct => AnswerStatus::Correct,
            Some(_) => AnswerStatus::Wrong,
        }
    }

    /// Record an answer, bumping the attempt count of any earlier entry.
    pub fn record_answer(
        &mut self,
        id: &QuestionId,
        selected: u32,
        correct: bool,
        answered_at: DateTime<Utc>,
    ) -> &SolvedEntry {
        let count = self
            .solved
            .get(id)
            .map_or(1, |prior| prior.count.saturating_add(1));
        self.solved.insert(
            id.clone(),
            SolvedEntry {
                correct,
                count,
                last_date: answered_at,
                selected_answer: selected,
            },
        );
        &self.solved[id]
    }

    /// Ids whose latest answer was wrong.
    pub fn wrong_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.solved
            .iter()
            .filter(|(_, entry)| !entry.correct)
            .map(|(id, _)| id)
    }

    #[must_use]
    pub fn is_bookmarked(&self, id: &QuestionId) -> bool {
        self.bookmarks.contains(id)
    }

    /// Flip bookmark membership. Returns the new state.
    pub fn toggle_bookmark(&mut self, id: &QuestionId) -> bool {
        if self.bookmarks.remove(id) {
            false
        } else {
            self.bookmarks.insert(id.clone());
            true
        }
    }

    /// Stored card progress, or the fresh default for untouched cards.
    #[must_use]
    pub fn card_progress(&self, id: &CardId) -> FlashcardProgress {
        self.fc_cards.get(id).copied().unwrap_or_default()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
