//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document storage settings
    pub store: StoreConfig,
    /// Interactive shell settings
    pub shell: ShellConfig,
    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    pub log_level: String,
}

/// Document storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one file per document
    pub root: PathBuf,
    /// File extension of document files
    pub extension: String,
    /// Rewrite documents through a temp file and rename
    pub atomic_writes: bool,
}

/// Interactive shell settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt printed before each input line
    pub prompt: String,
    /// Print the welcome banner on start
    pub show_banner: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("database"),
            extension: "txt".to_string(),
            atomic_writes: true,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            show_banner: true,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "docshell", "Docshell")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config directory.
    ///
    /// A file that cannot be read or parsed yields defaults plus the error, so
    /// the caller can report it once logging is up.
    pub fn load_or_default() -> (Self, Option<anyhow::Error>) {
        match Self::config_path() {
            Some(path) => Self::load_or_default_from(&path),
            None => (Self::default(), None),
        }
    }

    pub fn load_or_default_from(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Level used when the config names none
    pub fn default_log_level() -> &'static str {
        "warn"
    }

    /// Effective log level
    pub fn log_level(&self) -> &str {
        if self.log_level.is_empty() {
            Self::default_log_level()
        } else {
            &self.log_level
        }
    }
}
