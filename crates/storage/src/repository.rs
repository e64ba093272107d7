use async_trait::async_trait;
use study_core::model::ContentBundle;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Slot name the progress snapshot is stored under.
pub const DEFAULT_SLOT_KEY: &str = "study_progress_v2";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// A single opaque key-value slot holding the serialized progress snapshot.
///
/// Adapters only move strings; encoding and recovery live in the services layer.
#[async_trait]
pub trait ProgressSlot: Send + Sync {
    /// Read the stored value, `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn write(&self, value: &str) -> Result<(), StorageError>;

    /// Remove the stored value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Bulk loader for questions, flashcards, law texts and pass rates.
///
/// Loading is all-or-nothing: any failure fails the whole call.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if any part of the content cannot be read or parsed.
    async fn load_content(&self) -> Result<ContentBundle, StorageError>;
}

/// Simple in-memory slot for testing and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemorySlot {
    value: Arc<Mutex<Option<String>>>,
}

impl InMemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with `value`, e.g. to simulate an older or corrupt save.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    /// Current raw contents, for assertions.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.value.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl ProgressSlot for InMemorySlot {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .value
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn write(&self, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .value
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(value.to_owned());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .value
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Content already held in memory.
#[derive(Clone, Default)]
pub struct StaticContent {
    bundle: ContentBundle,
}

impl StaticContent {
    #[must_use]
    pub fn new(bundle: ContentBundle) -> Self {
        Self { bundle }
    }
}

#[async_trait]
impl ContentSource for StaticContent {
    async fn load_content(&self) -> Result<ContentBundle, StorageError> {
        Ok(self.bundle.clone())
    }
}

/// Storage backends behind trait objects for easy swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressSlot>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressSlot> = Arc::new(InMemorySlot::new());
        Self { progress }
    }
}
