//! Undo log of the last committed batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::episode::AuditLog;

const JOURNAL_FILE_NAME: &str = "last_batch.json";

/// One committed rename: where the file is now and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoEntry {
    pub renamed: PathBuf,
    pub original: PathBuf,
    /// Moved to its final name after the rest of the batch.
    #[serde(default)]
    pub retargeted: bool,
}

/// Renames of a single batch in commit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
}

/// Result of an undo call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndoReport {
    pub restored: usize,
    pub total: usize,
}

impl UndoLog {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push(&mut self, renamed: PathBuf, original: PathBuf) {
        self.entries.push(UndoEntry {
            renamed,
            original,
            retargeted: false,
        });
    }

    /// Point the entry currently ending at `from` to `to`, keeping its original path.
    /// Returns false if no entry ends at `from`.
    pub fn retarget(&mut self, from: &Path, to: PathBuf) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.renamed == from) {
            entry.renamed = to;
            entry.retargeted = true;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default journal location for persisting the log between runs.
    #[must_use]
    pub fn default_journal_path() -> Option<PathBuf> {
        let data_dir = dirs::data_local_dir()?;
        Some(data_dir.join(env!("CARGO_PKG_NAME")).join(JOURNAL_FILE_NAME))
    }

    /// Read a persisted log. A missing journal is an empty log.
    ///
    /// # Errors
    /// Returns an error if the journal exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse undo journal {}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read undo journal {}: {error}",
                path.display()
            )),
        }
    }

    /// Write the log as JSON, replacing any previous journal.
    ///
    /// # Errors
    /// Returns an error if the journal cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create journal directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize undo journal")?;
        fs::write(path, json).with_context(|| format!("Failed to write undo journal {}", path.display()))
    }
}

/// Reverse all renames of the log, most recent first, and clear it.
///
/// A retargeted entry ends at a name that a later entry started from,
/// so an entry whose original path is held by a pending retargeted entry
/// waits until that file has been moved back.
/// Entries whose renamed file no longer exists are skipped.
/// Failures do not stop the remaining entries.
pub fn undo(log: &mut UndoLog, audit: &mut AuditLog) -> UndoReport {
    let mut pending = std::mem::take(&mut log.entries);
    let mut report = UndoReport {
        restored: 0,
        total: pending.len(),
    };

    while !pending.is_empty() {
        let index = (0..pending.len())
            .rev()
            .find(|&i| {
                !pending
                    .iter()
                    .any(|other| other.retargeted && other.renamed == pending[i].original)
            })
            .unwrap_or(pending.len() - 1);
        let entry = pending.remove(index);

        if !entry.renamed.exists() {
            audit.warning(format!(
                "UNDO SKIPPED: '{}' no longer exists",
                entry.renamed.display()
            ));
            continue;
        }
        match fs::rename(&entry.renamed, &entry.original) {
            Ok(()) => {
                audit.info(format!(
                    "UNDO OPERATION: '{}' to '{}'",
                    entry.renamed.display(),
                    entry.original.display()
                ));
                report.restored += 1;
            }
            Err(error) => {
                audit.error(format!(
                    "UNDO FAILED: '{}' to '{}'. Reason: {error}",
                    entry.renamed.display(),
                    entry.original.display()
                ));
            }
        }
    }

    report
}
