//! Episode number renaming.
//!
//! Finds video files with an `S<season>E<episode>` token in the file name,
//! shifts the episode number by a signed offset and renames the files as one batch.
//! Renames go through conflict handling, are written to an audit log,
//! and the last committed batch can be undone.

mod audit;
mod candidate;
mod conflict;
mod error;
mod executor;
mod frontend;
mod planner;
mod scanner;
mod session;
mod token;
mod undo;

pub use audit::{AuditLog, Level};
pub use candidate::{Candidate, CandidateId};
pub use conflict::{ConflictAction, ConflictChoice, ConflictPolicy, ConflictResolver, ConflictState, auto_suffix_path};
pub use error::RenameError;
pub use executor::{BatchExecutor, BatchReport, Operation, OperationOutcome};
pub use frontend::{Frontend, ProgressReporter};
pub use planner::{NewName, PlannedRename, RenameStatus, Selection, new_name, plan, preview};
pub use scanner::{Omission, OmissionReason, ScanResult, Scanner, VIDEO_EXTENSIONS};
pub use session::Session;
pub use token::EpisodeToken;
pub use undo::{UndoEntry, UndoLog, UndoReport, undo};
