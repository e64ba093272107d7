mod content;
mod flashcard;
mod ids;
mod progress;
mod question;

pub use content::{ContentBundle, PassRateCell, PassRateRow, PassRateTable};
pub use flashcard::{Flashcard, FlashcardProgress, LevelLabel, MasteryLevel};
pub use ids::{CardId, ParseIdError, QuestionId};
pub use progress::{AnswerStatus, ProgressSnapshot, SolvedEntry};
pub use question::{AnswerKey, Question};
