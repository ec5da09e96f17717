//! Interactive shell session over the document store

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use super::command::{parse, Command, MetaCommand};
use crate::core::config::ShellConfig;
use crate::core::document::Document;
use crate::core::error::StoreError;
use crate::core::file_system::DocumentStore;

pub const WELCOME: &str = "Welcome to docshell, a flat-file key-value document store.";

pub const USAGE: &str = "To use the database, use commands \"get\", \"set\", and \"display\". \
Type \"quit\" to quit the program. Type \"help\" to repeat this message at any point.";

/// Result of feeding one line to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print these lines and read the next input
    Continue(Vec<String>),
    /// End the session
    Quit,
}

/// Shell session. Holds nothing but the store handle and its settings.
pub struct Shell {
    store: DocumentStore,
    config: ShellConfig,
}

impl Shell {
    pub fn new(store: DocumentStore, config: ShellConfig) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Execute one input line
    pub fn execute(&self, line: &str) -> Flow {
        match MetaCommand::from_line(line) {
            Some(MetaCommand::Quit) => return Flow::Quit,
            Some(MetaCommand::Help) => {
                return Flow::Continue(vec![USAGE.to_string(), String::new()]);
            }
            None => {}
        }

        let mut output = match parse(line) {
            Ok(None) => return Flow::Continue(Vec::new()),
            Ok(Some(command)) => self.dispatch(command),
            Err(e) => {
                tracing::debug!("Rejected input: {:?}", e);
                vec![e.to_string()]
            }
        };
        output.push(String::new());
        Flow::Continue(output)
    }

    /// Run the read-eval-print loop until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        if self.config.show_banner {
            writeln!(output, "{}\n", WELCOME)?;
            writeln!(output, "{}\n", USAGE)?;
        }

        let mut buf = Vec::new();
        loop {
            write!(output, "{}", self.config.prompt)?;
            output.flush()?;

            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .context("Failed to read from input")?;
            if read == 0 {
                tracing::debug!("End of input, closing session");
                writeln!(output)?;
                return Ok(());
            }

            // Invalid UTF-8 is replaced rather than ending the session
            let line = String::from_utf8_lossy(&buf);
            let command = line.trim_end_matches(['\n', '\r']);
            match self.execute(command) {
                Flow::Quit => return Ok(()),
                Flow::Continue(lines) => {
                    for text in lines {
                        writeln!(output, "{}", text)?;
                    }
                }
            }
        }
    }

    fn dispatch(&self, command: Command) -> Vec<String> {
        tracing::debug!("Dispatching {:?}", command);

        match command {
            Command::Get { document, key } => match self.store.get(&document, &key) {
                Ok(Some(value)) => vec![format!("{}[{}] holds: {}", document, key, value)],
                Ok(None) => vec![no_value(&document, &key)],
                Err(e) if e.is_not_found() => vec![e.to_string(), no_value(&document, &key)],
                Err(e) => vec![store_error(&e)],
            },
            Command::Set {
                document,
                key,
                value,
            } => match self.store.set(&document, &key, &value) {
                Ok(_) => Vec::new(),
                Err(e) => vec![store_error(&e)],
            },
            Command::Display { document } => match self.store.display(&document) {
                Ok(doc) => render_table(&document, &doc),
                Err(e) if e.is_not_found() => vec![e.to_string()],
                Err(e) => vec![store_error(&e)],
            },
        }
    }
}

fn no_value(document: &str, key: &str) -> String {
    format!("No value found for {}[{}]", document, key)
}

fn store_error(e: &StoreError) -> String {
    tracing::warn!("Store operation failed: {}", e);
    match std::error::Error::source(e) {
        Some(source) => format!("Error: {} ({})", e, source),
        None => format!("Error: {}", e),
    }
}

/// Header line followed by right-aligned keys
fn render_table(name: &str, doc: &Document) -> Vec<String> {
    std::iter::once(format!(" ------- {} ------- ", name))
        .chain(
            doc.entries()
                .iter()
                .map(|entry| format!("{:>20} : {}", entry.key, entry.value)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn shell() -> (tempfile::TempDir, Shell) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("database"));
        (dir, Shell::new(store, ShellConfig::default()))
    }

    fn lines(flow: Flow) -> Vec<String> {
        match flow {
            Flow::Continue(lines) => lines,
            Flow::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_set_is_silent_and_get_reports_value() {
        let (_dir, shell) = shell();
        assert_eq!(lines(shell.execute("set users alice 30")), vec![""]);
        assert_eq!(
            lines(shell.execute("get users alice")),
            vec!["users[alice] holds: 30", ""]
        );
        assert_eq!(
            lines(shell.execute("get users bob")),
            vec!["No value found for users[bob]", ""]
        );
    }

    #[test]
    fn test_get_missing_document_keeps_going() {
        let (_dir, shell) = shell();
        assert_eq!(
            lines(shell.execute("get ghost x")),
            vec![
                "No document \"ghost.txt\" found in the database.",
                "No value found for ghost[x]",
                "",
            ]
        );
        assert_eq!(
            lines(shell.execute("display ghost")),
            vec!["No document \"ghost.txt\" found in the database.", ""]
        );
    }

    #[test]
    fn test_display_table() {
        let (_dir, shell) = shell();
        shell.execute("set users alice 30");
        shell.execute("set users bob 25");
        shell.execute("set users alice 31");

        assert_eq!(
            lines(shell.execute("display users")),
            vec![
                " ------- users ------- ".to_string(),
                format!("{:>20} : 31", "alice"),
                format!("{:>20} : 25", "bob"),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_errors_are_reported() {
        let (_dir, shell) = shell();
        assert_eq!(
            lines(shell.execute("fetch users")),
            vec!["Unrecognized command.", ""]
        );
        assert_eq!(
            lines(shell.execute("set users alice")),
            vec![
                "Incorrect args, call to \"set\" expects: set <document_name> <key> <value>",
                "",
            ]
        );

        let out = lines(shell.execute("set users alice  "));
        assert!(out[0].starts_with("Error: value must not be empty"));
        assert!(!shell.store().document_path("users").exists());
    }

    #[test]
    fn test_stored_empty_value_is_reported_not_printed() {
        let (_dir, shell) = shell();
        std::fs::create_dir_all(shell.store().root()).unwrap();
        std::fs::write(shell.store().document_path("gap"), "k  v\n").unwrap();

        let out = lines(shell.execute("get gap k"));
        assert!(out[0].starts_with("Error: Malformed entry in \"gap.txt\" at line 1"));
        assert!(!out[0].contains("holds"));
    }

    #[test]
    fn test_meta_commands() {
        let (_dir, shell) = shell();
        assert_eq!(shell.execute("quit"), Flow::Quit);
        assert_eq!(lines(shell.execute("help")), vec![USAGE, ""]);
        assert!(lines(shell.execute("")).is_empty());
    }

    #[test]
    fn test_run_session() {
        let (_dir, shell) = shell();
        let input = Cursor::new("set users alice 30\r\nget users alice\nquit\nget users alice\n");
        let mut output = Vec::new();
        shell.run(input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with(WELCOME));
        assert_eq!(text.matches("users[alice] holds: 30").count(), 1);
        assert!(text.ends_with("> "));
    }

    #[test]
    fn test_run_survives_invalid_utf8_line() {
        let (_dir, shell) = shell();
        let input = Cursor::new(&b"get \xff x\nset users alice 30\nget users alice\nquit\n"[..]);
        let mut output = Vec::new();
        shell.run(input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("users[alice] holds: 30"));
        assert!(shell.store().document_path("users").exists());
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShellConfig {
            prompt: "$ ".to_string(),
            show_banner: false,
        };
        let shell = Shell::new(DocumentStore::new(dir.path()), config);

        let mut output = Vec::new();
        shell.run(Cursor::new("display nothing\n"), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "$ No document \"nothing.txt\" found in the database.\n\n$ \n"
        );
    }
}
