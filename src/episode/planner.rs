//! Episode number arithmetic and preview planning.

use std::collections::HashSet;
use std::fmt;

use crate::episode::{Candidate, CandidateId, EpisodeToken};

/// Set of candidates chosen for renaming.
pub type Selection = HashSet<CandidateId>;

/// Status of a candidate in the preview or after an apply attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameStatus {
    Pending,
    NoChange,
    Skipped,
    DryRunOk,
    Success,
    ConflictSkip,
    Error(String),
}

impl RenameStatus {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for RenameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::NoChange => write!(f, "No Change"),
            Self::Skipped => write!(f, "Skipped"),
            Self::DryRunOk => write!(f, "[DRY RUN] OK"),
            Self::Success => write!(f, "Success"),
            Self::ConflictSkip => write!(f, "Conflict-Skip"),
            Self::Error(_) => write!(f, "Error: Failed"),
        }
    }
}

/// Computed name for a candidate together with the token it will carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewName {
    pub name: String,
    pub token: EpisodeToken,
}

/// Preview row for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub candidate: CandidateId,
    /// Empty when the candidate is not selected.
    pub proposed_name: String,
    pub status: RenameStatus,
}

/// Shift the episode number of the candidate by `increment`.
///
/// The result never goes below episode zero and keeps at least the original digit width.
/// Returns `None` when the digit run cannot be parsed,
/// in which case the name stays unchanged.
#[must_use]
pub fn new_name(candidate: &Candidate, increment: i64) -> Option<NewName> {
    let name = candidate.original_name();
    let token = candidate.token();
    let number = token.episode_number()?;

    let shifted = (i128::from(number) + i128::from(increment)).max(0);
    let width = token.digits().len();
    let digits = format!("{shifted:0width$}");

    let new_token = token.with_digits(digits);
    let new_name = format!(
        "{}{}{}{}{}",
        &name[..token.start()],
        token.season(),
        token.prefix(),
        new_token.digits(),
        &name[token.end()..]
    );
    Some(NewName {
        name: new_name,
        token: new_token,
    })
}

/// Proposed filename for the candidate, falling back to the current name.
#[must_use]
pub fn plan(candidate: &Candidate, increment: i64) -> String {
    new_name(candidate, increment).map_or_else(|| candidate.original_name().to_string(), |new| new.name)
}

/// Compute the preview rows for all candidates.
///
/// Pure function meant to be called again whenever the selection or increment changes.
#[must_use]
pub fn preview(candidates: &[Candidate], selection: &Selection, increment: i64) -> Vec<PlannedRename> {
    candidates
        .iter()
        .map(|candidate| {
            if !selection.contains(&candidate.id()) {
                return PlannedRename {
                    candidate: candidate.id(),
                    proposed_name: String::new(),
                    status: RenameStatus::Skipped,
                };
            }
            let proposed_name = plan(candidate, increment);
            let status = if increment == 0 || proposed_name == candidate.original_name() {
                RenameStatus::NoChange
            } else {
                RenameStatus::Pending
            };
            PlannedRename {
                candidate: candidate.id(),
                proposed_name,
                status,
            }
        })
        .collect()
}
