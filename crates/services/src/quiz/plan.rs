use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use study_core::model::{ProgressSnapshot, Question};

/// How a filtered question set is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    /// Bank order.
    #[default]
    Sequential,
    /// Fresh uniform shuffle on every call.
    Random,
    /// Wrong first, then unsolved, then correct; bank order within each group.
    Weak,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuizMode::Sequential => "sequential",
            QuizMode::Random => "random",
            QuizMode::Weak => "weak",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown quiz mode: {0}")]
pub struct ParseQuizModeError(String);

impl FromStr for QuizMode {
    type Err = ParseQuizModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(QuizMode::Sequential),
            "random" => Ok(QuizMode::Random),
            "weak" => Ok(QuizMode::Weak),
            other => Err(ParseQuizModeError(other.to_owned())),
        }
    }
}

/// Selected exam years and subjects.
///
/// Both axes must match; an empty axis selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSelection {
    pub years: BTreeSet<u16>,
    pub subjects: BTreeSet<String>,
}

impl QuizSelection {
    /// Every year and subject present in `questions`.
    #[must_use]
    pub fn all(questions: &[Question]) -> Self {
        Self {
            years: questions.iter().map(|q| q.exam_year).collect(),
            subjects: questions.iter().map(|q| q.subject.clone()).collect(),
        }
    }

    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        self.years.contains(&question.exam_year) && self.subjects.contains(&question.subject)
    }

    /// Flip a year in or out of the selection. Returns the new state.
    pub fn toggle_year(&mut self, year: u16) -> bool {
        if self.years.remove(&year) {
            false
        } else {
            self.years.insert(year);
            true
        }
    }

    /// Flip a subject in or out of the selection. Returns the new state.
    pub fn toggle_subject(&mut self, subject: &str) -> bool {
        if self.subjects.remove(subject) {
            false
        } else {
            self.subjects.insert(subject.to_owned());
            true
        }
    }
}

/// Derives the active question list from a selection and a mode.
///
/// Pure over (bank, progress, selection); randomness comes from the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionBankFilter;

impl QuestionBankFilter {
    /// Questions matching the selection, in bank order.
    #[must_use]
    pub fn filter(questions: &[Question], selection: &QuizSelection) -> Vec<Question> {
        questions
            .iter()
            .filter(|q| selection.matches(q))
            .cloned()
            .collect()
    }

    /// Reorder `questions` according to `mode`.
    pub fn order<R: Rng + ?Sized>(
        mut questions: Vec<Question>,
        mode: QuizMode,
        progress: &ProgressSnapshot,
        rng: &mut R,
    ) -> Vec<Question> {
        match mode {
            QuizMode::Sequential => {}
            QuizMode::Random => questions.shuffle(rng),
            QuizMode::Weak => {
                questions.sort_by_key(|q| progress.status(&q.id).weak_priority());
            }
        }
        questions
    }

    /// `filter` followed by `order`.
    pub fn select<R: Rng + ?Sized>(
        questions: &[Question],
        selection: &QuizSelection,
        mode: QuizMode,
        progress: &ProgressSnapshot,
        rng: &mut R,
    ) -> Vec<Question> {
        Self::order(Self::filter(questions, selection), mode, progress, rng)
    }

    /// Distinct exam years, ascending.
    #[must_use]
    pub fn available_years(questions: &[Question]) -> Vec<u16> {
        questions
            .iter()
            .map(|q| q.exam_year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct subjects in the order they first appear.
    #[must_use]
    pub fn available_subjects(questions: &[Question]) -> Vec<String> {
        first_appearance(questions.iter().map(|q| q.subject.as_str()))
    }
}

pub(crate) fn first_appearance<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(*item))
        .map(str::to_owned)
        .collect()
}
