#![forbid(unsafe_code)]

pub mod analytics_service;
pub mod context;
pub mod error;
pub mod flashcard_service;
pub mod progress_store;
pub mod quiz;

#[cfg(test)]
mod test_support;

pub use study_core::Clock;

pub use analytics_service::{AnalyticsService, Dashboard};
pub use context::StudyContext;
pub use error::{AppServicesError, SessionError};
pub use flashcard_service::{FlashcardPanel, FlashcardService};
pub use progress_store::ProgressStore;
pub use quiz::{QUICK_QUIZ_SIZE, QuestionBankFilter, QuizLoopService, QuizMode, QuizSelection};
