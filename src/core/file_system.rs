//! File-backed document store: one flat file per document

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::config::StoreConfig;
use super::document::{Document, Upsert};
use super::error::{Result, StoreError};
use super::tokenizer::SEPARATOR;

/// Document store rooted at a directory
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    extension: String,
    atomic_writes: bool,
}

impl DocumentStore {
    /// Create a store with default settings at `root`
    #[cfg(test)]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&StoreConfig {
            root: root.into(),
            ..StoreConfig::default()
        })
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            root: config.root.clone(),
            extension: config.extension.clone(),
            atomic_writes: config.atomic_writes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name of a document, e.g. `users.txt`. Names are not escaped.
    pub fn file_name(&self, document: &str) -> String {
        format!("{}.{}", document, self.extension)
    }

    /// Path of a document's file
    pub fn document_path(&self, document: &str) -> PathBuf {
        self.root.join(self.file_name(document))
    }

    /// Read a whole document
    pub fn display(&self, document: &str) -> Result<Document> {
        let file = self.file_name(document);
        match fs::read_to_string(self.document_path(document)) {
            Ok(content) => Document::parse(&file, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::DocumentNotFound { file })
            }
            Err(source) => Err(StoreError::ReadFailure { file, source }),
        }
    }

    /// Look up a key. `Ok(None)` means the document exists but has no such key.
    pub fn get(&self, document: &str, key: &str) -> Result<Option<String>> {
        let doc = self.display(document)?;
        Ok(doc.get(key).map(str::to_string))
    }

    /// Insert or overwrite a key, rewriting the whole document file
    pub fn set(&self, document: &str, key: &str, value: &str) -> Result<Upsert> {
        validate("document name", document, false)?;
        validate("key", key, true)?;
        validate("value", value, false)?;

        let mut doc = match self.display(document) {
            Ok(doc) => doc,
            Err(e) if e.is_not_found() => Document::new(),
            Err(e) => return Err(e),
        };

        let outcome = doc.set(key, value);
        self.write(document, &doc)?;

        tracing::info!(
            "{:?} {}[{}] in {} ({} entries)",
            outcome,
            document,
            key,
            self.document_path(document).display(),
            doc.len()
        );
        Ok(outcome)
    }

    /// Names of all documents in the store, sorted
    pub fn list_documents(&self) -> Vec<String> {
        if !self.root.is_dir() {
            return Vec::new();
        }

        let mut names: Vec<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == self.extension.as_str())
                    .unwrap_or(false)
            })
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
            })
            .collect();

        names.sort();
        names
    }

    /// Replace the document file with the rendered document
    fn write(&self, document: &str, doc: &Document) -> Result<()> {
        let file = self.file_name(document);
        let path = self.document_path(document);
        let content = doc.render();

        fs::create_dir_all(&self.root).map_err(|source| StoreError::WriteFailure {
            file: file.clone(),
            source,
        })?;

        if !self.atomic_writes {
            return fs::write(&path, content)
                .map_err(|source| StoreError::WriteFailure { file, source });
        }

        // Same directory as the document so the rename stays atomic
        let temp = path.with_file_name(format!(
            ".{}.tmp",
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| file.clone())
        ));
        let result = fs::write(&temp, content).and_then(|_| fs::rename(&temp, &path));
        if let Err(source) = result {
            if temp.exists() {
                if let Err(e) = fs::remove_file(&temp) {
                    tracing::warn!("Failed to remove temp file {}: {}", temp.display(), e);
                }
            }
            return Err(StoreError::WriteFailure { file, source });
        }

        Ok(())
    }
}

/// Reject text the line format cannot store faithfully
fn validate(field: &'static str, text: &str, allow_empty: bool) -> Result<()> {
    if text.is_empty() && !allow_empty {
        return Err(StoreError::EmptyField { field });
    }

    if let Some(character) = text
        .chars()
        .find(|&c| c == SEPARATOR || c == '\n' || c == '\r')
    {
        return Err(StoreError::InvalidCharacter {
            field,
            text: text.to_string(),
            character,
        });
    }

    Ok(())
}
