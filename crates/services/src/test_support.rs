use std::sync::Arc;

use storage::{InMemorySlot, StaticContent};
use study_core::model::{AnswerKey, CardId, ContentBundle, Flashcard, Question, QuestionId};
use study_core::time::fixed_clock;

use crate::context::StudyContext;
use crate::progress_store::ProgressStore;

pub(crate) fn question(id: &str, year: u16, subject: &str, answer: &str) -> Question {
    Question {
        id: QuestionId::new(id),
        exam_year: year,
        round: 1,
        subject: subject.to_owned(),
        number: 1,
        question: format!("question {id}"),
        options: vec!["one".into(), "two".into(), "three".into(), "four".into()],
        answer: AnswerKey::parse(answer),
        explanation: String::new(),
        memory_tip: None,
    }
}

pub(crate) fn card(id: &str, subject: &str) -> Flashcard {
    Flashcard {
        id: CardId::new(id),
        subject: subject.to_owned(),
        front: format!("front {id}"),
        back: format!("back {id}"),
    }
}

pub(crate) async fn context_with(
    questions: Vec<Question>,
    flashcards: Vec<Flashcard>,
) -> (StudyContext, InMemorySlot) {
    let slot = InMemorySlot::new();
    let content = StaticContent::new(ContentBundle {
        questions,
        flashcards,
        ..ContentBundle::default()
    });
    let ctx = StudyContext::bootstrap(
        &content,
        ProgressStore::new(Arc::new(slot.clone())),
        fixed_clock(),
    )
    .await
    .expect("static content always loads");
    (ctx, slot)
}
