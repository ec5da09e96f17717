//! Parsing of shell input into store commands

use thiserror::Error;

use crate::core::tokenizer::split_default;

/// Lines handled by the shell itself, matched before tokenizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Quit,
    Help,
}

impl MetaCommand {
    pub fn from_line(line: &str) -> Option<Self> {
        match line {
            "quit" => Some(Self::Quit),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Command words understood by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Get,
    Set,
    Display,
}

impl CommandKind {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            "display" => Some(Self::Display),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Display => "display",
        }
    }

    /// Number of arguments after the command word
    pub fn arity(self) -> usize {
        match self {
            Self::Get => 2,
            Self::Set => 3,
            Self::Display => 1,
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Self::Get => "get <document_name> <key>",
            Self::Set => "set <document_name> <key> <value>",
            Self::Display => "display <document_name>",
        }
    }
}

/// A validated store command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get {
        document: String,
        key: String,
    },
    Set {
        document: String,
        key: String,
        value: String,
    },
    Display {
        document: String,
    },
}

/// Input the interpreter refuses to run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unrecognized command.")]
    Unrecognized(String),

    #[error("Incorrect args, call to \"{}\" expects: {}", .kind.name(), .kind.usage())]
    Arity { kind: CommandKind, given: usize },
}

/// Parse a line into a command. `Ok(None)` means there was nothing to run.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut tokens = split_default(line);
    if tokens.is_empty() {
        return Ok(None);
    }

    let word = tokens.remove(0);
    let kind = CommandKind::from_word(&word).ok_or(CommandError::Unrecognized(word))?;
    if tokens.len() != kind.arity() {
        return Err(CommandError::Arity {
            kind,
            given: tokens.len(),
        });
    }

    let mut args = tokens.into_iter();
    let mut next = || args.next().unwrap_or_default();
    let command = match kind {
        CommandKind::Get => Command::Get {
            document: next(),
            key: next(),
        },
        CommandKind::Set => Command::Set {
            document: next(),
            key: next(),
            value: next(),
        },
        CommandKind::Display => Command::Display { document: next() },
    };

    Ok(Some(command))
}
