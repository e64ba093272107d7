use std::sync::Arc;

use storage::ContentSource;
use study_core::Clock;
use study_core::model::{ContentBundle, ProgressSnapshot};
use study_core::scheduler::FlashcardScheduler;

use crate::error::AppServicesError;
use crate::progress_store::ProgressStore;

/// Loaded content plus the live progress snapshot.
///
/// Every workflow takes the context explicitly; mutations go through
/// `progress_mut` and are flushed with `commit`.
#[derive(Debug, Clone)]
pub struct StudyContext {
    content: Arc<ContentBundle>,
    progress: ProgressSnapshot,
    store: ProgressStore,
    clock: Clock,
}

impl StudyContext {
    /// Load content and progress, and give every card a progress entry.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::ContentLoad` if the content source fails.
    /// Progress problems never fail bootstrap.
    pub async fn bootstrap(
        source: &dyn ContentSource,
        store: ProgressStore,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let content = source
            .load_content()
            .await
            .map_err(AppServicesError::ContentLoad)?;
        let mut progress = store.load().await;
        let added = FlashcardScheduler::initialize(&content.flashcards, &mut progress);
        store.save(&progress).await;

        tracing::info!(
            questions = content.questions.len(),
            flashcards = content.flashcards.len(),
            solved = progress.solved.len(),
            new_cards = added,
            "study context ready"
        );

        Ok(Self {
            content: Arc::new(content),
            progress,
            store,
            clock,
        })
    }

    #[must_use]
    pub fn content(&self) -> &ContentBundle {
        &self.content
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressSnapshot {
        &self.progress
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub(crate) fn progress_mut(&mut self) -> &mut ProgressSnapshot {
        &mut self.progress
    }

    /// Persist the current snapshot. Failures are logged, never returned.
    pub async fn commit(&self) {
        self.store.save(&self.progress).await;
    }

    /// Drop all progress and persist the empty snapshot.
    pub async fn reset_progress(&mut self) {
        tracing::info!(solved = self.progress.solved.len(), "resetting progress");
        self.progress = ProgressSnapshot::default();
        self.commit().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::{InMemorySlot, StaticContent, StorageError};
    use study_core::model::{CardId, Flashcard};
    use study_core::time::fixed_clock;

    struct BrokenContent;

    #[async_trait::async_trait]
    impl ContentSource for BrokenContent {
        async fn load_content(&self) -> Result<ContentBundle, StorageError> {
            Err(StorageError::NotFound("questions.json".into()))
        }
    }

    fn card(id: &str) -> Flashcard {
        Flashcard {
            id: CardId::new(id),
            subject: "law".into(),
            front: "front".into(),
            back: "back".into(),
        }
    }

    #[tokio::test]
    async fn bootstrap_initializes_cards_and_saves_once() {
        let slot = InMemorySlot::new();
        let content = StaticContent::new(ContentBundle {
            flashcards: vec![card("c1"), card("c2")],
            ..ContentBundle::default()
        });

        let ctx = StudyContext::bootstrap(
            &content,
            ProgressStore::new(Arc::new(slot.clone())),
            fixed_clock(),
        )
        .await
        .unwrap();

        assert_eq!(ctx.progress().fc_cards.len(), 2);
        let saved = slot.snapshot().unwrap();
        assert!(saved.contains("\"c1\""));
    }

    #[tokio::test]
    async fn content_failure_is_fatal() {
        let store = ProgressStore::new(Arc::new(InMemorySlot::new()));
        let err = StudyContext::bootstrap(&BrokenContent, store, fixed_clock())
            .await
            .unwrap_err();
        assert!(matches!(err, AppServicesError::ContentLoad(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn reset_persists_empty_snapshot() {
        let slot = InMemorySlot::new();
        let content = StaticContent::new(ContentBundle {
            flashcards: vec![card("c1")],
            ..ContentBundle::default()
        });
        let mut ctx = StudyContext::bootstrap(
            &content,
            ProgressStore::new(Arc::new(slot.clone())),
            fixed_clock(),
        )
        .await
        .unwrap();

        ctx.reset_progress().await;

        assert_eq!(ctx.progress(), &ProgressSnapshot::default());
        let reloaded = ProgressStore::new(Arc::new(slot)).load().await;
        assert_eq!(reloaded, ProgressSnapshot::default());
    }
}
