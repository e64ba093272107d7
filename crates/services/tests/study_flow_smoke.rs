use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Duration;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{
    AnalyticsService, Clock, FlashcardService, ProgressStore, QuizLoopService, QuizMode,
    QuizSelection, SessionError, StudyContext,
};
use storage::{InMemorySlot, StaticContent, Storage};
use study_core::model::{AnswerKey, CardId, ContentBundle, Flashcard, Question, QuestionId};
use study_core::quiz::Navigation;
use study_core::time::fixed_now;

fn question(id: &str, year: u16, subject: &str, answer: &str) -> Question {
    Question {
        id: QuestionId::new(id),
        exam_year: year,
        round: 1,
        subject: subject.to_owned(),
        number: 1,
        question: format!("question {id}"),
        options: vec!["1".into(), "2".into(), "3".into(), "4".into()],
        answer: AnswerKey::parse(answer),
        explanation: String::new(),
        memory_tip: Some("tip".into()),
    }
}

fn content() -> StaticContent {
    let questions = (0..10)
        .map(|i| question(&format!("q{i}"), 2020 + (i % 3), "Law", "2,3"))
        .collect();
    StaticContent::new(ContentBundle {
        questions,
        flashcards: vec![Flashcard {
            id: CardId::new("c1"),
            subject: "Law".into(),
            front: "front".into(),
            back: "back".into(),
        }],
        ..ContentBundle::default()
    })
}

#[tokio::test]
async fn quiz_progress_survives_restart_on_sqlite() {
    let storage = Storage::sqlite("sqlite::memory:").await.unwrap();
    let store = ProgressStore::new(storage.progress.clone());
    let source = content();

    let mut ctx = StudyContext::bootstrap(&source, store.clone(), Clock::fixed(fixed_now()))
        .await
        .unwrap();
    let mut session = QuizLoopService::start_filtered(
        &ctx,
        &QuizSelection::all(&ctx.content().questions),
        QuizMode::Sequential,
        &mut StdRng::seed_from_u64(11),
    )
    .unwrap();

    // six right (2 or 3), four wrong (1)
    for i in 0..10 {
        let option = if i < 6 { 2 + (i % 2) } else { 1 };
        QuizLoopService::answer_current(&mut ctx, &mut session, option).await;
        let step = session.next();
        if i < 9 {
            assert_eq!(step, Navigation::Moved);
        } else {
            assert_eq!(step, Navigation::Finished);
        }
    }

    let result = session.compute_result();
    assert_eq!(result.correct_count, 6);
    assert_eq!(result.total, 10);
    assert_eq!(result.percentage(), 60);

    let restarted = StudyContext::bootstrap(&source, store, Clock::fixed(fixed_now()))
        .await
        .unwrap();
    assert_eq!(restarted.progress(), ctx.progress());
    assert_eq!(AnalyticsService::overview(&restarted).wrong, 4);
}

#[tokio::test]
async fn corrupt_slot_recovers_to_defaults() {
    let slot = InMemorySlot::with_value("{\"solved\": [1, 2");
    let store = ProgressStore::new(Arc::new(slot.clone()));

    let ctx = StudyContext::bootstrap(&content(), store, Clock::fixed(fixed_now()))
        .await
        .unwrap();

    assert!(ctx.progress().solved.is_empty());
    assert_eq!(ctx.progress().fc_cards.len(), 1);
    // bootstrap rewrote the slot with a valid snapshot
    assert!(slot.snapshot().unwrap().starts_with('{'));
    assert!(slot.snapshot().unwrap().contains("fcCards"));
}

#[tokio::test]
async fn advisories_leave_progress_untouched() {
    let slot = InMemorySlot::new();
    let ctx = StudyContext::bootstrap(
        &content(),
        ProgressStore::new(Arc::new(slot.clone())),
        Clock::fixed(fixed_now()),
    )
    .await
    .unwrap();
    let before = slot.snapshot();

    let mut rng = StdRng::seed_from_u64(5);
    assert_eq!(
        QuizLoopService::start_wrong_review(&ctx, &mut rng).unwrap_err(),
        SessionError::NoWrongAnswers
    );
    assert_eq!(
        QuizLoopService::start_bookmark_review(&ctx).unwrap_err(),
        SessionError::NoBookmarks
    );
    let mut nothing = QuizSelection::all(&ctx.content().questions);
    nothing.years.clear();
    assert_eq!(
        QuizLoopService::start_filtered(&ctx, &nothing, QuizMode::Random, &mut rng).unwrap_err(),
        SessionError::EmptySelection
    );

    assert_eq!(slot.snapshot(), before);
}

#[tokio::test]
async fn flashcard_leveling_follows_schedule() {
    let mut clock = Clock::fixed(fixed_now());
    let slot = InMemorySlot::new();
    let mut ctx = StudyContext::bootstrap(
        &content(),
        ProgressStore::new(Arc::new(slot)),
        clock,
    )
    .await
    .unwrap();
    let subjects = BTreeSet::from(["Law".to_owned()]);
    let mut deck = FlashcardService::build_deck(&ctx, &subjects);

    let expected = [Duration::minutes(10), Duration::days(1), Duration::days(30)];
    for delay in expected {
        FlashcardService::know(&mut ctx, &mut deck).await;
        let state = ctx.progress().card_progress(&CardId::new("c1"));
        assert_eq!(state.next_review - clock.now(), delay);
    }

    clock.advance(Duration::days(1));
    let state = ctx.progress().card_progress(&CardId::new("c1"));
    assert!(!state.is_due(clock.now()));
    assert_eq!(FlashcardService::panel(&ctx, &deck).known, 1);
}
