//! Store error types

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document file does not exist. Informational: the shell reports it
    /// and carries on.
    #[error("No document \"{file}\" found in the database.")]
    DocumentNotFound { file: String },

    /// A stored line could not be decoded into a key and a value
    #[error("Malformed entry in \"{file}\" at line {line}: {content:?}")]
    MalformedEntry {
        file: String,
        line: usize,
        content: String,
    },

    /// The document exists but could not be read
    #[error("Could not read document \"{file}\"")]
    ReadFailure {
        file: String,
        #[source]
        source: io::Error,
    },

    /// The destination could not be opened or written
    #[error("Could not open or create document \"{file}\"")]
    WriteFailure {
        file: String,
        #[source]
        source: io::Error,
    },

    /// A name, key or value contains a character the line format reserves
    #[error("{field} {text:?} must not contain {character:?}")]
    InvalidCharacter {
        field: &'static str,
        text: String,
        character: char,
    },

    /// A field that must be present was empty
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

impl StoreError {
    /// Whether this error only means the document is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::DocumentNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::DocumentNotFound {
            file: "ghost.txt".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "No document \"ghost.txt\" found in the database."
        );
    }

    #[test]
    fn test_write_failure_keeps_source() {
        let err = StoreError::WriteFailure {
            file: "users.txt".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }
}
