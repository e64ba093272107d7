use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::CardId;

//
// ─── FLASHCARD ─────────────────────────────────────────────────────────────────
//

/// A front/back study card. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: CardId,
    pub subject: String,
    pub front: String,
    pub back: String,
}

//
// ─── MASTERY LEVEL ─────────────────────────────────────────────────────────────
//

/// Spaced-repetition level of a card, always in `0..=3`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "u8")]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    pub const NEW: Self = Self(0);
    pub const MASTERED: Self = Self(3);

    /// Builds a level, clamping out-of-range values into `0..=3`.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MASTERED.0))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// One step up, saturating at mastered.
    #[must_use]
    pub fn promoted(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    #[must_use]
    pub fn is_mastered(self) -> bool {
        self == Self::MASTERED
    }

    #[must_use]
    pub fn label(self) -> LevelLabel {
        match self.0 {
            0 => LevelLabel::New,
            1 => LevelLabel::Learning,
            2 => LevelLabel::Review,
            _ => LevelLabel::Mastered,
        }
    }
}

impl From<i64> for MasteryLevel {
    fn from(value: i64) -> Self {
        let clamped = value.clamp(0, i64::from(Self::MASTERED.0));
        Self::new(u8::try_from(clamped).unwrap_or(0))
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> Self {
        level.0
    }
}

/// Display badge for a mastery level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelLabel {
    New,
    Learning,
    Review,
    Mastered,
}

impl std::fmt::Display for LevelLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LevelLabel::New => "New",
            LevelLabel::Learning => "Learning",
            LevelLabel::Review => "Review",
            LevelLabel::Mastered => "Mastered",
        })
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Scheduling state of one flashcard.
///
/// A card is due once `next_review <= now`. New and reset cards carry the Unix
/// epoch so they are always due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardProgress {
    #[serde(default)]
    pub level: MasteryLevel,
    #[serde(with = "chrono::serde::ts_milliseconds", default = "unix_epoch")]
    pub next_review: DateTime<Utc>,
}

impl FlashcardProgress {
    /// Level 0, due immediately.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            level: MasteryLevel::NEW,
            next_review: unix_epoch(),
        }
    }

    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Default for FlashcardProgress {
    fn default() -> Self {
        Self::fresh()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn level_is_clamped() {
        assert_eq!(MasteryLevel::new(9), MasteryLevel::MASTERED);
        assert_eq!(MasteryLevel::from(-4_i64), MasteryLevel::NEW);
        assert_eq!(MasteryLevel::from(2_i64).value(), 2);
    }

    #[test]
    fn promotion_saturates_at_mastered() {
        let level = MasteryLevel::NEW.promoted().promoted().promoted().promoted();
        assert!(level.is_mastered());
        assert_eq!(level.label(), LevelLabel::Mastered);
    }

    #[test]
    fn fresh_progress_is_due() {
        let progress = FlashcardProgress::fresh();
        assert!(progress.is_due(fixed_now()));
        assert_eq!(progress.level.label(), LevelLabel::New);
    }

    #[test]
    fn due_boundary_is_inclusive() {
        let now = fixed_now();
        let progress = FlashcardProgress {
            level: MasteryLevel::new(1),
            next_review: now,
        };
        assert!(progress.is_due(now));
        assert!(!progress.is_due(now - chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn progress_uses_epoch_millis_on_the_wire() {
        let json = r#"{"level": 7, "nextReview": 0}"#;
        let progress: FlashcardProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.level, MasteryLevel::MASTERED);
        assert_eq!(progress.next_review, DateTime::<Utc>::UNIX_EPOCH);

        let out = serde_json::to_value(progress).unwrap();
        assert_eq!(out["nextReview"], 0);
        assert_eq!(out["level"], 3);
    }
}
