//! Word list model and loader.
//!
//! A dataset is a JSON array of `[id, headword, text]` rows. Row order is the
//! navigation order; the first row of the bundled list is a title row.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(u64),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{n}"),
            EntryId::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(EntryId, String, String)", into = "(EntryId, String, String)")]
pub struct WordEntry {
    pub id: EntryId,
    pub headword: String,
    pub text: String,
}

impl From<(EntryId, String, String)> for WordEntry {
    fn from((id, headword, text): (EntryId, String, String)) -> Self {
        Self { id, headword, text }
    }
}

impl From<WordEntry> for (EntryId, String, String) {
    fn from(entry: WordEntry) -> Self {
        (entry.id, entry.headword, entry.text)
    }
}

impl WordEntry {
    pub fn new(id: u64, headword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: EntryId::Number(id),
            headword: headword.into(),
            text: text.into(),
        }
    }
}

/// Ordered, read-only word list.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    entries: Vec<WordEntry>,
}

impl WordList {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a signed index; `None` for negative or past-the-end indices.
    pub fn get(&self, index: i64) -> Option<&WordEntry> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| self.entries.get(idx))
    }
}

pub fn parse_word_list(json: &str) -> Result<WordList> {
    let entries: Vec<WordEntry> = serde_json::from_str(json).context("Parsing word list JSON")?;
    debug!(count = entries.len(), "Parsed word list");
    Ok(WordList::new(entries))
}

pub fn load_word_list(path: &Path) -> Result<WordList> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Reading word list {}", path.display()))?;
    let list = parse_word_list(&data)
        .with_context(|| format!("Loading word list {}", path.display()))?;
    info!(path = %path.display(), entries = list.len(), "Loaded word list");
    Ok(list)
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
