//! Docshell - flat-file key-value document store
//!
//! Documents live as `<name>.txt` files under the store root and are read
//! and written through an interactive `get` / `set` / `display` shell.

mod core;
mod terminal;

use std::io;
use std::str::FromStr;

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::config::AppConfig;
use crate::core::file_system::DocumentStore;
use crate::terminal::Shell;

fn main() -> Result<()> {
    let (config, config_error) = AppConfig::load_or_default();

    // Logs go to stderr so they stay out of the shell's output
    let level = LevelFilter::from_str(config.log_level()).unwrap_or(LevelFilter::WARN);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(level)
        .init();

    if let Some(e) = config_error {
        tracing::warn!("Ignoring settings file, using defaults: {:#}", e);
    }

    let store = DocumentStore::from_config(&config.store);
    tracing::info!(
        "Opened store at {} ({} documents)",
        store.root().display(),
        store.list_documents().len()
    );

    let shell = Shell::new(store, config.shell);
    shell.run(io::stdin().lock(), io::stdout().lock())
}
