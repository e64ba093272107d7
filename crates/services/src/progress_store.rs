use std::sync::Arc;

use storage::ProgressSlot;
use study_core::model::ProgressSnapshot;

/// Loads and saves the progress snapshot through a storage slot.
///
/// Neither direction fails from the caller's point of view: unreadable or
/// corrupt data loads as an empty snapshot, and failed writes are logged and
/// dropped so the user keeps going without persistence.
#[derive(Clone)]
pub struct ProgressStore {
    slot: Arc<dyn ProgressSlot>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(slot: Arc<dyn ProgressSlot>) -> Self {
        Self { slot }
    }

    pub async fn load(&self) -> ProgressSnapshot {
        let raw = match self.slot.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return ProgressSnapshot::default(),
            Err(err) => {
                tracing::warn!(error = %err, "progress read failed; starting fresh");
                return ProgressSnapshot::default();
            }
        };

        match serde_json::from_str::<ProgressSnapshot>(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "stored progress is corrupt; starting fresh");
                ProgressSnapshot::default()
            }
        }
    }

    pub async fn save(&self, snapshot: &ProgressSnapshot) {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "progress could not be encoded; not saved");
                return;
            }
        };

        if let Err(err) = self.slot.write(&raw).await {
            tracing::warn!(error = %err, "progress write failed; continuing without saving");
        }
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore").finish_non_exhaustive()
    }
}
