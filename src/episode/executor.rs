//! Batch rename execution with conflict handling and post-batch reconciliation.

use std::fs;
use std::path::PathBuf;

use crate::episode::conflict::{ConflictAction, ConflictResolver, ConflictState, auto_suffix_path};
use crate::episode::{
    AuditLog, Candidate, CandidateId, EpisodeToken, ProgressReporter, RenameError, RenameStatus, UndoLog, planner,
};

/// A rename to perform: built only for candidates whose name actually changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub candidate: CandidateId,
    /// Token of the destination name.
    pub token: EpisodeToken,
}

impl Operation {
    /// Operation moving the candidate to its incremented name,
    /// or `None` if the name would not change.
    #[must_use]
    pub fn for_candidate(candidate: &Candidate, increment: i64) -> Option<Self> {
        let new = planner::new_name(candidate, increment)?;
        if new.name == candidate.original_name() {
            return None;
        }
        Some(Self {
            source: candidate.path().to_path_buf(),
            destination: candidate.directory().join(&new.name),
            candidate: candidate.id(),
            token: new.token,
        })
    }
}

/// Result for one processed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub candidate: CandidateId,
    /// Path the file was (or would be) moved to.
    pub target: PathBuf,
    pub status: RenameStatus,
}

/// Summary of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub success_count: usize,
    pub outcomes: Vec<OperationOutcome>,
    pub undo_log: UndoLog,
    /// The user cancelled on a conflict; later operations were not processed.
    pub cancelled: bool,
    pub dry_run: bool,
}

impl BatchReport {
    #[must_use]
    pub fn count(&self, status: &RenameStatus) -> usize {
        self.outcomes.iter().filter(|outcome| &outcome.status == status).count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.status.is_error()).count()
    }
}

/// Auto-renamed operation waiting for its intended name to free up.
#[derive(Debug)]
struct Suffixed {
    outcome: usize,
    temporary: PathBuf,
    intended: PathBuf,
    token: EpisodeToken,
}

/// Runs a batch of operations in order.
#[derive(Debug)]
pub struct BatchExecutor<'a> {
    audit: &'a mut AuditLog,
    dry_run: bool,
}

impl<'a> BatchExecutor<'a> {
    #[must_use]
    pub const fn new(audit: &'a mut AuditLog, dry_run: bool) -> Self {
        Self { audit, dry_run }
    }

    /// Execute all operations, updating the matching candidates after each committed rename.
    ///
    /// Individual failures are recorded in the report and never stop the batch.
    /// Only a `cancel` answer to a conflict ends it early.
    ///
    /// # Errors
    /// Returns `RenameError::NoChanges` without touching the filesystem if there are no operations.
    pub fn run<F>(
        &mut self,
        candidates: &mut [Candidate],
        operations: Vec<Operation>,
        frontend: &mut F,
    ) -> Result<BatchReport, RenameError>
    where
        F: ConflictResolver + ProgressReporter + ?Sized,
    {
        if operations.is_empty() {
            return Err(RenameError::NoChanges);
        }

        let mut report = BatchReport {
            total: operations.len(),
            dry_run: self.dry_run,
            ..BatchReport::default()
        };
        let mut conflicts = ConflictState::new();
        let mut suffixed: Vec<Suffixed> = Vec::new();

        self.audit.info(format!(
            "BATCH START: {} operation(s){}",
            operations.len(),
            if self.dry_run { " (dry run)" } else { "" }
        ));

        for operation in operations {
            if operation.source == operation.destination {
                continue;
            }

            if self.dry_run {
                self.audit.info(format!(
                    "DRY RUN: Evaluated '{}' to '{}'",
                    operation.source.display(),
                    operation.destination.display()
                ));
                report.success_count += 1;
                Self::record(
                    &mut report,
                    frontend,
                    operation.candidate,
                    operation.destination,
                    RenameStatus::DryRunOk,
                );
                continue;
            }

            let mut target = operation.destination.clone();
            let mut auto_renamed = false;

            if target.exists() {
                let file_name = crate::path_to_filename_string(&target);
                match conflicts.decide(frontend, &file_name) {
                    ConflictAction::Skip => {
                        self.audit
                            .info(format!("Skipped conflict existing target: {}", target.display()));
                        Self::record(
                            &mut report,
                            frontend,
                            operation.candidate,
                            target,
                            RenameStatus::ConflictSkip,
                        );
                        continue;
                    }
                    ConflictAction::Cancel => {
                        self.audit
                            .warning("Rename operation aborted by user due to conflict.");
                        report.cancelled = true;
                        break;
                    }
                    ConflictAction::AutoRename => {
                        target = auto_suffix_path(&target);
                        auto_renamed = true;
                    }
                    ConflictAction::Overwrite => {
                        self.audit
                            .warning(format!("Overwriting existing file: {}", target.display()));
                    }
                }
            }

            match fs::rename(&operation.source, &target) {
                Ok(()) => {
                    self.audit.info(format!(
                        "RENAMED: '{}' -> '{}'",
                        operation.source.display(),
                        target.display()
                    ));
                    report.success_count += 1;
                    report.undo_log.push(target.clone(), operation.source.clone());
                    update_candidate(candidates, operation.candidate, &target, operation.token.clone());

                    if auto_renamed {
                        suffixed.push(Suffixed {
                            outcome: report.outcomes.len(),
                            temporary: target.clone(),
                            intended: operation.destination,
                            token: operation.token,
                        });
                    }
                    Self::record(&mut report, frontend, operation.candidate, target, RenameStatus::Success);
                }
                Err(error) => {
                    self.audit.error(format!(
                        "FAILED renaming: '{}' -> '{}'. Reason: {error}",
                        operation.source.display(),
                        target.display()
                    ));
                    Self::record(
                        &mut report,
                        frontend,
                        operation.candidate,
                        target,
                        RenameStatus::Error(error.to_string()),
                    );
                }
            }
        }

        if !self.dry_run {
            self.reconcile(candidates, &mut report, suffixed, frontend);
        }

        self.audit.info(format!(
            "BATCH END: {} of {} succeeded{}",
            report.success_count,
            report.total,
            if report.cancelled { ", cancelled" } else { "" }
        ));

        Ok(report)
    }

    /// Second pass: move auto-suffixed files to their intended name if it has been freed
    /// by a later operation in the same batch.
    fn reconcile<F>(
        &mut self,
        candidates: &mut [Candidate],
        report: &mut BatchReport,
        suffixed: Vec<Suffixed>,
        frontend: &mut F,
    ) where
        F: ProgressReporter + ?Sized,
    {
        for item in suffixed {
            if item.intended.exists() {
                self.audit.debug(format!(
                    "POST-BATCH: '{}' still taken, keeping '{}'",
                    item.intended.display(),
                    item.temporary.display()
                ));
                continue;
            }
            match fs::rename(&item.temporary, &item.intended) {
                Ok(()) => {
                    self.audit.info(format!(
                        "POST-BATCH RENAME: '{}' -> '{}'",
                        item.temporary.display(),
                        item.intended.display()
                    ));
                    report.undo_log.retarget(&item.temporary, item.intended.clone());
                    if let Some(outcome) = report.outcomes.get_mut(item.outcome) {
                        update_candidate(candidates, outcome.candidate, &item.intended, item.token);
                        outcome.target.clone_from(&item.intended);
                        outcome.status = RenameStatus::Success;
                        frontend.report_progress(
                            outcome.candidate,
                            &crate::path_to_filename_string(&outcome.target),
                            &outcome.status,
                        );
                    }
                }
                Err(error) => {
                    self.audit.error(format!(
                        "POST-BATCH RENAME FAILED: '{}' -> '{}'. Reason: {error}",
                        item.temporary.display(),
                        item.intended.display()
                    ));
                }
            }
        }
    }

    fn record<F>(
        report: &mut BatchReport,
        frontend: &mut F,
        candidate: CandidateId,
        target: PathBuf,
        status: RenameStatus,
    ) where
        F: ProgressReporter + ?Sized,
    {
        frontend.report_progress(candidate, &crate::path_to_filename_string(&target), &status);
        report.outcomes.push(OperationOutcome {
            candidate,
            target,
            status,
        });
    }
}

fn update_candidate(candidates: &mut [Candidate], id: CandidateId, target: &std::path::Path, token: EpisodeToken) {
    let name = crate::path_to_filename_string(target);
    if let Some(candidate) = candidates.iter_mut().find(|candidate| candidate.id() == id) {
        candidate.apply_rename(name, token);
    }
}
