//! Wiring of the expiry engine to SQLite and the terminal.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use larder_domain::traits::{DeliveryOutcome, NotificationSink, SystemClock};
use larder_janitor::{ExpiryLifecycle, JanitorConfig};
use larder_store::{SqlitePreferences, SqliteStore};
use std::fs;
use std::path::Path;

/// The engine as the CLI runs it.
pub type Engine = ExpiryLifecycle<SqliteStore, SqlitePreferences, TerminalSink, SystemClock>;

/// Notification sink that prints to stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSink {
    color: bool,
}

impl TerminalSink {
    /// Create a sink; `color` enables ANSI styling.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl NotificationSink for TerminalSink {
    fn deliver(&self, title: &str, body: &str) -> DeliveryOutcome {
        let formatter = Formatter::new(OutputFormat::Table, self.color);
        eprintln!("{}", formatter.notification(title, body));
        tracing::info!(title, body, "Notification delivered");
        DeliveryOutcome::Delivered
    }
}

/// Open the database at `path` (creating it if needed) and assemble the engine.
pub fn open_engine(path: &Path, config: &JanitorConfig, color: bool) -> Result<Engine> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!("Opening database at {}", path.display());
    let store = SqliteStore::new(path)?;
    let prefs = SqlitePreferences::new(path)?;

    Ok(ExpiryLifecycle::new(
        store,
        prefs,
        TerminalSink::new(color),
        SystemClock,
        config.clone(),
    ))
}
