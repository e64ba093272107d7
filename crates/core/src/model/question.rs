use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::ids::QuestionId;

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// The set of correct option numbers for a question.
///
/// Content encodes the key as a comma-separated list of 1-based option numbers
/// (`"2"`, `"2,3"`, `"1,2,3,4"`). The raw text is kept for display; lookups go
/// through the parsed set.
///
/// # Examples
///
/// ```
/// # use study_core::model::AnswerKey;
/// let key = AnswerKey::parse("2, 3");
/// assert!(key.is_correct(3));
/// assert!(!key.is_correct(1));
/// assert!(key.is_multi());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    raw: String,
    correct: BTreeSet<u32>,
}

impl AnswerKey {
    /// Parse a raw answer specification. Tokens without a leading number are dropped.
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let correct = raw.split(',').filter_map(parse_option_token).collect();
        Self { raw, correct }
    }

    /// The answer exactly as the content source encoded it.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn correct_options(&self) -> &BTreeSet<u32> {
        &self.correct
    }

    #[must_use]
    pub fn is_correct(&self, option: u32) -> bool {
        self.correct.contains(&option)
    }

    /// True when more than one option is accepted.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.correct.len() > 1
    }
}

/// Reads the leading decimal digits of a token, ignoring surrounding whitespace.
fn parse_option_token(token: &str) -> Option<u32> {
    let token = token.trim();
    let digits_end = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(token.len(), |(idx, _)| idx);
    token[..digits_end].parse().ok()
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for AnswerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawAnswer::deserialize(deserializer)? {
            RawAnswer::Text(text) => Self::parse(text),
            RawAnswer::Number(n) => Self::parse(n.to_string()),
        })
    }
}

impl Serialize for AnswerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A past exam question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub exam_year: u16,
    pub round: u32,
    pub subject: String,
    pub number: u32,
    pub question: String,
    pub options: Vec<String>,
    pub answer: AnswerKey,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub memory_tip: Option<String>,
}

impl Question {
    #[must_use]
    pub fn is_correct(&self, option: u32) -> bool {
        self.answer.is_correct(option)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
