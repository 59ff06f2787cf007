//! Append-only audit trail of scans, plans, renames and undo actions.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Deserialize;

const LOG_FILE_NAME: &str = "renamer_history.log";

/// Severity of an audit entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        write!(f, "{name}")
    }
}

/// File logger writing `<timestamp> - <LEVEL> - <message>` lines.
///
/// Write errors are ignored: a failing log must never interrupt a batch.
pub struct AuditLog {
    writer: Option<BufWriter<File>>,
    min_level: Level,
}

impl AuditLog {
    /// Open the log file for appending, creating it and its directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be created.
    pub fn open(path: &Path, min_level: Level) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            min_level,
        })
    }

    /// Logger that discards everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            writer: None,
            min_level: Level::Error,
        }
    }

    /// Default log location: `~/logs/episode-bump/renamer_history.log`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        let home_dir = dirs::home_dir()?;
        Some(home_dir.join("logs").join(env!("CARGO_PKG_NAME")).join(LOG_FILE_NAME))
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S,%3f").to_string()
    }

    pub fn log(&mut self, level: Level, message: impl fmt::Display) {
        if level < self.min_level {
            return;
        }
        if let Some(writer) = self.writer.as_mut() {
            let _ = writeln!(writer, "{} - {level} - {message}", Self::timestamp());
            let _ = writer.flush();
        }
    }

    pub fn debug(&mut self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    pub fn info(&mut self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    pub fn warning(&mut self, message: impl fmt::Display) {
        self.log(Level::Warning, message);
    }

    pub fn error(&mut self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog")
            .field("enabled", &self.is_enabled())
            .field("min_level", &self.min_level)
            .finish()
    }
}
