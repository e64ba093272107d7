use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use study_core::model::{ContentBundle, Flashcard, PassRateTable, Question};

use crate::repository::{ContentSource, StorageError};

pub const QUESTIONS_FILE: &str = "questions.json";
pub const FLASHCARDS_FILE: &str = "flashcards.json";
pub const PASS_RATES_FILE: &str = "pass_rates.json";
pub const LAW_DIR: &str = "law";

/// Reads content from a directory laid out as:
///
/// ```text
/// <root>/questions.json
/// <root>/flashcards.json
/// <root>/pass_rates.json   (optional)
/// <root>/law/*.txt         (optional, keyed by file stem)
/// ```
#[derive(Debug, Clone)]
pub struct JsonContentDir {
    root: PathBuf,
}

impl JsonContentDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, StorageError> {
        let path = self.root.join(name);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| io_error(&path, &err))?;
        serde_json::from_str(&raw)
            .map_err(|err| StorageError::Serialization(format!("{}: {err}", path.display())))
    }

    async fn read_pass_rates(&self) -> Result<BTreeMap<String, PassRateTable>, StorageError> {
        match self.read_json(PASS_RATES_FILE).await {
            Err(StorageError::NotFound(_)) => Ok(BTreeMap::new()),
            other => other,
        }
    }

    async fn read_law_texts(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let dir = self.root.join(LAW_DIR);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(io_error(&dir, &err)),
        };

        let mut texts = BTreeMap::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| io_error(&dir, &err))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|err| io_error(&path, &err))?;
            texts.insert(stem.to_owned(), text);
        }
        Ok(texts)
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound(path.display().to_string())
    } else {
        StorageError::Io(format!("{}: {err}", path.display()))
    }
}

#[async_trait]
impl ContentSource for JsonContentDir {
    async fn load_content(&self) -> Result<ContentBundle, StorageError> {
        let questions: Vec<Question> = self.read_json(QUESTIONS_FILE).await?;
        let flashcards: Vec<Flashcard> = self.read_json(FLASHCARDS_FILE).await?;
        let pass_rates = self.read_pass_rates().await?;
        let law_texts = self.read_law_texts().await?;

        tracing::debug!(
            root = %self.root.display(),
            questions = questions.len(),
            flashcards = flashcards.len(),
            law_texts = law_texts.len(),
            "loaded content directory"
        );

        Ok(ContentBundle {
            questions,
            flashcards,
            law_texts,
            pass_rates,
        })
    }
}
