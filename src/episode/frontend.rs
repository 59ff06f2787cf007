//! Interface implemented by the interactive shell driving a session.

use std::path::PathBuf;

use crate::episode::{Candidate, CandidateId, ConflictResolver, RenameStatus, Selection};

/// Receives display updates after each planning or execution step.
pub trait ProgressReporter {
    fn report_progress(&mut self, candidate: CandidateId, displayed_name: &str, status: &RenameStatus) {
        let _ = (candidate, displayed_name, status);
    }
}

/// Everything a session needs from the user.
pub trait Frontend: ConflictResolver + ProgressReporter {
    /// Directory to scan, or `None` if the user made no choice.
    fn select_directory(&mut self) -> Option<PathBuf>;

    /// Candidates currently selected for renaming.
    fn selection(&self, candidates: &[Candidate]) -> Selection;

    /// Requested episode offset, or `None` if the input is not a valid integer.
    fn increment(&self) -> Option<i64>;

    fn dry_run(&self) -> bool;

    /// Final confirmation before a real batch.
    fn confirm(&mut self, message: &str) -> bool;
}
