//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;
use study_core::quiz::QuizError;

/// Errors emitted when starting or driving a quiz session.
///
/// These are user-facing advisories: the operation is aborted and no state
/// changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions match the current selection")]
    EmptySelection,
    #[error("there are no wrong answers to review")]
    NoWrongAnswers,
    #[error("there are no bookmarked questions")]
    NoBookmarks,
}

impl From<QuizError> for SessionError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::EmptySelection => SessionError::EmptySelection,
        }
    }
}

/// Errors emitted while bootstrapping app services.
///
/// Any of these is fatal: the app shows a single load-error state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("content could not be loaded: {0}")]
    ContentLoad(#[source] StorageError),
}
