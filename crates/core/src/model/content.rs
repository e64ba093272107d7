use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::flashcard::Flashcard;
use crate::model::question::Question;

/// One cell of a pass-rate table; sources mix text and numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassRateCell {
    Text(String),
    Number(f64),
}

impl fmt::Display for PassRateCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassRateCell::Text(text) => f.write_str(text),
            PassRateCell::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRateRow {
    pub label: String,
    pub values: Vec<PassRateCell>,
}

/// Historical pass rates for one exam stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRateTable {
    pub headers: Vec<String>,
    pub data: Vec<PassRateRow>,
}

/// Everything the content source delivers at startup.
///
/// Law texts stay raw: splitting them into articles happens outside the core.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentBundle {
    pub questions: Vec<Question>,
    pub flashcards: Vec<Flashcard>,
    pub law_texts: BTreeMap<String, String>,
    pub pass_rates: BTreeMap<String, PassRateTable>,
}

impl ContentBundle {
    /// Pass-rate table for the given stage (e.g. `"first"`), if the source had one.
    #[must_use]
    pub fn pass_rate(&self, kind: &str) -> Option<&PassRateTable> {
        self.pass_rates.get(kind)
    }

    #[must_use]
    pub fn law_text(&self, name: &str) -> Option<&str> {
        self.law_texts.get(name).map(String::as_str)
    }
}
