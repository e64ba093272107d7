mod plan;
mod workflow;

pub use plan::{ParseQuizModeError, QuestionBankFilter, QuizMode, QuizSelection};
pub(crate) use plan::first_appearance;
pub use workflow::{QUICK_QUIZ_SIZE, QuizLoopService};
