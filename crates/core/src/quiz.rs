use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{ProgressSnapshot, Question};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("no questions selected")]
    EmptySelection,
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Active,
    Finished,
}

/// What `answer` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded { correct: bool, attempts: u32 },
    /// The current question already had an answer; nothing changed.
    AlreadyAnswered,
}

/// What `next` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved,
    Finished,
    Stayed,
}

/// Read-only view of the question under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub question: Question,
    /// 1-based position in the session.
    pub position: usize,
    pub total: usize,
    pub selected: Option<u32>,
    pub is_correct: Option<bool>,
    pub is_multi_answer: bool,
    pub bookmarked: bool,
    pub is_last: bool,
}

/// A wrongly answered question in the result summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongAnswer {
    pub question: Question,
    pub selected: u32,
    /// The answer key as the content encoded it, e.g. `"2,3"`.
    pub correct_answer: String,
}

/// Score for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub correct_count: usize,
    pub total: usize,
    pub wrong: Vec<WrongAnswer>,
}

impl QuizResult {
    /// Rounded score in percent; 0 for an empty session.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.correct_count as f64 / self.total as f64 * 100.0).round() as u32
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz run over a fixed question sequence.
///
/// Each index is answered at most once; answering writes the question's
/// `SolvedEntry` into the snapshot passed in. The session itself is never
/// persisted.
#[derive(Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: BTreeMap<usize, u32>,
    phase: QuizPhase,
}

impl QuizSession {
    /// Start a session at the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptySelection` if `questions` is empty.
    pub fn start(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptySelection);
        }
        Ok(Self {
            questions,
            current: 0,
            answers: BTreeMap::new(),
            phase: QuizPhase::Active,
        })
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn selected(&self, index: usize) -> Option<u32> {
        self.answers.get(&index).copied()
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn view(&self, progress: &ProgressSnapshot) -> QuestionView {
        let question = self.current_question();
        let selected = self.selected(self.current);
        QuestionView {
            question: question.clone(),
            position: self.current + 1,
            total: self.questions.len(),
            selected,
            is_correct: selected.map(|option| question.is_correct(option)),
            is_multi_answer: question.answer.is_multi(),
            bookmarked: progress.is_bookmarked(&question.id),
            is_last: self.is_last(),
        }
    }

    /// Answer the current question with a 1-based option number.
    ///
    /// The first answer for an index is final: later calls return
    /// `AnswerOutcome::AlreadyAnswered` and leave the snapshot alone.
    pub fn answer(
        &mut self,
        option: u32,
        progress: &mut ProgressSnapshot,
        answered_at: DateTime<Utc>,
    ) -> AnswerOutcome {
        if self.is_answered(self.current) {
            return AnswerOutcome::AlreadyAnswered;
        }

        let question = &self.questions[self.current];
        let correct = question.is_correct(option);
        self.answers.insert(self.current, option);
        let entry = progress.record_answer(&question.id, option, correct, answered_at);

        AnswerOutcome::Recorded {
            correct,
            attempts: entry.count,
        }
    }

    /// Move forward, or finish once the last question has an answer.
    pub fn next(&mut self) -> Navigation {
        if self.is_finished() {
            return Navigation::Stayed;
        }
        if !self.is_last() {
            self.current += 1;
            return Navigation::Moved;
        }
        if self.is_answered(self.current) {
            self.phase = QuizPhase::Finished;
            return Navigation::Finished;
        }
        Navigation::Stayed
    }

    /// Move back one question. Returns false at the first question.
    pub fn prev(&mut self) -> bool {
        if self.is_finished() || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Flip the bookmark on the current question. Returns the new state.
    pub fn toggle_bookmark(&self, progress: &mut ProgressSnapshot) -> bool {
        progress.toggle_bookmark(&self.current_question().id)
    }

    /// Score every question; unanswered ones count against the total only.
    #[must_use]
    pub fn compute_result(&self) -> QuizResult {
        let mut correct_count = 0;
        let mut wrong = Vec::new();

        for (index, question) in self.questions.iter().enumerate() {
            let Some(selected) = self.selected(index) else {
                continue;
            };
            if question.is_correct(selected) {
                correct_count += 1;
            } else {
                wrong.push(WrongAnswer {
                    question: question.clone(),
                    selected,
                    correct_answer: question.answer.raw().to_owned(),
                });
            }
        }

        QuizResult {
            correct_count,
            total: self.questions.len(),
            wrong,
        }
    }

    /// Questions answered wrongly in this session, in session order.
    #[must_use]
    pub fn wrong_questions(&self) -> Vec<Question> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                self.selected(*index)
                    .is_some_and(|selected| !question.is_correct(selected))
            })
            .map(|(_, question)| question.clone())
            .collect()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
