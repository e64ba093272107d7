use rand::Rng;
use rand::seq::SliceRandom;

use study_core::model::{AnswerStatus, Question};
use study_core::quiz::{AnswerOutcome, QuizSession};

use super::plan::{QuestionBankFilter, QuizMode, QuizSelection};
use crate::context::StudyContext;
use crate::error::SessionError;

/// Questions in a quick quiz.
pub const QUICK_QUIZ_SIZE: usize = 10;

/// Starts quiz sessions and persists the answers given in them.
///
/// Starters never touch progress; a failed start leaves everything as it was.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizLoopService;

impl QuizLoopService {
    /// Session over the filtered bank in the given mode.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySelection` if nothing matches the selection.
    pub fn start_filtered<R: Rng + ?Sized>(
        ctx: &StudyContext,
        selection: &QuizSelection,
        mode: QuizMode,
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        let questions = QuestionBankFilter::select(
            &ctx.content().questions,
            selection,
            mode,
            ctx.progress(),
            rng,
        );
        tracing::debug!(%mode, selected = questions.len(), "starting filtered quiz");
        Ok(QuizSession::start(questions)?)
    }

    /// Up to ten questions drawn uniformly from the whole bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySelection` if the bank is empty.
    pub fn start_quick<R: Rng + ?Sized>(
        ctx: &StudyContext,
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        let mut questions = ctx.content().questions.clone();
        questions.shuffle(rng);
        questions.truncate(QUICK_QUIZ_SIZE);
        tracing::debug!(selected = questions.len(), "starting quick quiz");
        Ok(QuizSession::start(questions)?)
    }

    /// Every question whose latest answer was wrong, shuffled.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoWrongAnswers` if there is nothing to review.
    pub fn start_wrong_review<R: Rng + ?Sized>(
        ctx: &StudyContext,
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        let mut questions: Vec<Question> = ctx
            .content()
            .questions
            .iter()
            .filter(|q| ctx.progress().status(&q.id) == AnswerStatus::Wrong)
            .cloned()
            .collect();
        if questions.is_empty() {
            return Err(SessionError::NoWrongAnswers);
        }
        questions.shuffle(rng);
        tracing::debug!(selected = questions.len(), "starting wrong-answer review");
        Ok(QuizSession::start(questions)?)
    }

    /// Bookmarked questions in bank order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoBookmarks` if no loaded question is bookmarked.
    pub fn start_bookmark_review(ctx: &StudyContext) -> Result<QuizSession, SessionError> {
        let questions: Vec<Question> = ctx
            .content()
            .questions
            .iter()
            .filter(|q| ctx.progress().is_bookmarked(&q.id))
            .cloned()
            .collect();
        if questions.is_empty() {
            return Err(SessionError::NoBookmarks);
        }
        tracing::debug!(selected = questions.len(), "starting bookmark review");
        Ok(QuizSession::start(questions)?)
    }

    /// New session over the questions answered wrongly in `finished`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoWrongAnswers` if every answer was correct.
    pub fn start_wrong_from_result(finished: &QuizSession) -> Result<QuizSession, SessionError> {
        let questions = finished.wrong_questions();
        if questions.is_empty() {
            return Err(SessionError::NoWrongAnswers);
        }
        tracing::debug!(selected = questions.len(), "retrying wrong answers from result");
        Ok(QuizSession::start(questions)?)
    }

    /// Answer the current question and persist the snapshot if it changed.
    pub async fn answer_current(
        ctx: &mut StudyContext,
        session: &mut QuizSession,
        option: u32,
    ) -> AnswerOutcome {
        let now = ctx.clock().now();
        let outcome = session.answer(option, ctx.progress_mut(), now);
        if let AnswerOutcome::Recorded { correct, attempts } = outcome {
            tracing::debug!(
                question = %session.current_question().id,
                option,
                correct,
                attempts,
                "answer recorded"
            );
            ctx.commit().await;
        }
        outcome
    }

    /// Toggle the bookmark on the current question and persist. Returns the new state.
    pub async fn toggle_bookmark(ctx: &mut StudyContext, session: &QuizSession) -> bool {
        let bookmarked = session.toggle_bookmark(ctx.progress_mut());
        ctx.commit().await;
        bookmarked
    }
}
