//! Stateful entry point tying scan, preview, apply and undo together.

use std::path::{Path, PathBuf};

use crate::episode::{
    AuditLog, BatchExecutor, BatchReport, Candidate, Frontend, OmissionReason, Operation, PlannedRename, RenameError,
    Scanner, Selection, UndoLog, UndoReport, planner, undo,
};

/// One renaming session: the current scan result and the undo log of the last batch.
///
/// Calls take `&mut self`, so scan, apply and undo can never overlap.
#[derive(Debug)]
pub struct Session {
    scanner: Scanner,
    audit: AuditLog,
    root: Option<PathBuf>,
    candidates: Vec<Candidate>,
    undo_log: UndoLog,
}

impl Session {
    #[must_use]
    pub fn new(scanner: Scanner, audit: AuditLog) -> Self {
        Self {
            scanner,
            audit,
            root: None,
            candidates: Vec::new(),
            undo_log: UndoLog::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub const fn undo_log(&self) -> &UndoLog {
        &self.undo_log
    }

    #[must_use]
    pub const fn can_undo(&self) -> bool {
        !self.undo_log.is_empty()
    }

    /// Replace the undo log, for example with one loaded from a journal.
    pub fn restore_undo_log(&mut self, log: UndoLog) {
        self.undo_log = log;
    }

    /// Ask the frontend for a directory and scan it.
    ///
    /// # Errors
    /// Returns an error if no directory was chosen or it cannot be scanned.
    pub fn select_and_scan<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Result<&[Candidate], RenameError> {
        let root = frontend.select_directory().ok_or(RenameError::NoDirectory)?;
        self.scan(&root)
    }

    /// Scan the given root, replacing the previous candidates.
    ///
    /// # Errors
    /// Returns an error if the root is not a directory.
    pub fn scan(&mut self, root: &Path) -> Result<&[Candidate], RenameError> {
        let result = self.scanner.scan(root)?;
        for omission in &result.omitted {
            let message = format!("SCAN OMITTED: '{}' ({})", omission.path.display(), omission.reason);
            match omission.reason {
                OmissionReason::UnsupportedExtension => self.audit.debug(message),
                OmissionReason::NoEpisodeToken | OmissionReason::NonUnicodeName => self.audit.info(message),
                OmissionReason::Unreadable(_) => self.audit.warning(message),
            }
        }
        self.audit.info(format!(
            "SCAN: found {} matching video file(s) in '{}', omitted {}",
            result.candidates.len(),
            root.display(),
            result.omitted.len()
        ));
        self.root = Some(root.to_path_buf());
        self.candidates = result.candidates;
        Ok(&self.candidates)
    }

    /// Scan the previous root again.
    ///
    /// # Errors
    /// Returns an error if nothing has been scanned yet or the root is gone.
    pub fn rescan(&mut self) -> Result<&[Candidate], RenameError> {
        let root = self.root.clone().ok_or(RenameError::NoDirectory)?;
        self.scan(&root)
    }

    /// Preview rows for the given selection and increment. Side-effect free.
    #[must_use]
    pub fn preview(&self, selection: &Selection, increment: i64) -> Vec<PlannedRename> {
        planner::preview(&self.candidates, selection, increment)
    }

    /// Recompute the preview from the frontend state and report every row.
    ///
    /// An invalid increment previews as zero.
    pub fn refresh_preview<F: Frontend + ?Sized>(&self, frontend: &mut F) -> Vec<PlannedRename> {
        let selection = frontend.selection(&self.candidates);
        let increment = frontend.increment().unwrap_or(0);
        let rows = self.preview(&selection, increment);
        for (row, candidate) in rows.iter().zip(&self.candidates) {
            let displayed_name = if row.proposed_name.is_empty() {
                candidate.original_name()
            } else {
                &row.proposed_name
            };
            frontend.report_progress(row.candidate, displayed_name, &row.status);
        }
        rows
    }

    /// Operations for the selected candidates whose name changes.
    fn plan_operations(&mut self, selection: &Selection, increment: i64) -> Vec<Operation> {
        self.candidates
            .iter()
            .filter(|candidate| selection.contains(&candidate.id()))
            .filter_map(|candidate| {
                let operation = Operation::for_candidate(candidate, increment);
                if operation.is_none() && candidate.token().episode_number().is_none() {
                    self.audit.warning(format!(
                        "Could not parse episode number, keeping name: '{}'",
                        candidate.path().display()
                    ));
                }
                operation
            })
            .collect()
    }

    /// Apply the current selection and increment.
    ///
    /// Preconditions are checked before anything is logged or renamed.
    /// A real batch asks for confirmation first.
    /// After a batch that renamed at least one file, its undo log replaces the previous one.
    ///
    /// # Errors
    /// Returns an error if the increment is invalid or zero, nothing is selected,
    /// no selected file would change, or the user declines.
    pub fn apply<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Result<BatchReport, RenameError> {
        let increment = frontend.increment().ok_or(RenameError::InvalidIncrement)?;
        if increment == 0 {
            return Err(RenameError::ZeroIncrement);
        }
        let selection = frontend.selection(&self.candidates);
        if !self.candidates.iter().any(|candidate| selection.contains(&candidate.id())) {
            return Err(RenameError::NothingSelected);
        }
        if !self
            .candidates
            .iter()
            .filter(|candidate| selection.contains(&candidate.id()))
            .any(|candidate| Operation::for_candidate(candidate, increment).is_some())
        {
            return Err(RenameError::NoChanges);
        }

        let dry_run = frontend.dry_run();
        if !dry_run {
            let count = self
                .candidates
                .iter()
                .filter(|candidate| selection.contains(&candidate.id()))
                .filter_map(|candidate| Operation::for_candidate(candidate, increment))
                .count();
            let message = format!(
                "You are about to rename {count} file(s).\nMake sure the files are not open in a media player."
            );
            if !frontend.confirm(&message) {
                return Err(RenameError::NotConfirmed);
            }
        }

        let operations = self.plan_operations(&selection, increment);
        for operation in &operations {
            self.audit.info(format!(
                "PLAN: '{}' -> '{}' (increment {increment})",
                operation.source.display(),
                operation.destination.display()
            ));
        }

        let report = BatchExecutor::new(&mut self.audit, dry_run).run(&mut self.candidates, operations, frontend)?;
        if !report.dry_run && !report.undo_log.is_empty() {
            self.undo_log = report.undo_log.clone();
        }
        Ok(report)
    }

    /// Reverse the last batch, then rescan the root if there is one.
    ///
    /// The undo log is cleared whether or not every entry could be restored.
    ///
    /// # Errors
    /// Returns `RenameError::NothingToUndo` if there is no batch to undo.
    pub fn undo(&mut self) -> Result<UndoReport, RenameError> {
        if self.undo_log.is_empty() {
            return Err(RenameError::NothingToUndo);
        }
        let report = undo::undo(&mut self.undo_log, &mut self.audit);
        self.audit.info(format!(
            "UNDO: restored {} of {} file(s)",
            report.restored, report.total
        ));
        if self.root.is_some()
            && let Err(error) = self.rescan()
        {
            self.audit.warning(format!("Rescan after undo failed: {error}"));
        }
        Ok(report)
    }
}
