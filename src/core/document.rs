//! Documents and their line-oriented text encoding

use thiserror::Error;

use super::error::{Result, StoreError};
use super::tokenizer::{split_default, SEPARATOR};

/// A single key-value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A line that does not hold both a key and a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected `<key> <value>`, got {0:?}")]
pub struct MalformedLine(pub String);

/// Decode one stored line into an entry.
///
/// Only the first two tokens are used; anything after the value is dropped.
/// An empty value (`"k  v"`) is malformed, since `set` never writes one.
pub fn decode_line(line: &str) -> std::result::Result<Entry, MalformedLine> {
    let mut tokens = split_default(line).into_iter();
    match (tokens.next(), tokens.next()) {
        (Some(key), Some(value)) if !value.is_empty() => {
            if tokens.next().is_some() {
                tracing::warn!("Truncating value for key {:?}: extra tokens ignored", key);
            }
            Ok(Entry { key, value })
        }
        _ => Err(MalformedLine(line.to_string())),
    }
}

/// Encode an entry as a stored line, without the line terminator
pub fn encode_line(key: &str, value: &str) -> String {
    format!("{key}{SEPARATOR}{value}")
}

/// Whether `set` replaced an existing entry or appended a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// An ordered collection of entries, one per key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    entries: Vec<Entry>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from its stored text.
    ///
    /// `file` is only used to label a malformed line in the error.
    pub fn parse(file: &str, content: &str) -> Result<Self> {
        let entries = content
            .lines()
            .enumerate()
            .map(|(i, line)| {
                decode_line(line).map_err(|MalformedLine(content)| StoreError::MalformedEntry {
                    file: file.to_string(),
                    line: i + 1,
                    content,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Render the document back to stored text, one newline-terminated line per entry
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| encode_line(&entry.key, &entry.value) + "\n")
            .collect()
    }

    /// Value of the first entry with the given key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Overwrite the value for `key` in place, or append a new entry
    pub fn set(&mut self, key: &str, value: &str) -> Upsert {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.value = value.to_string();
                Upsert::Replaced
            }
            None => {
                self.entries.push(Entry::new(key, value));
                Upsert::Inserted
            }
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
