//! Resolution of destination name collisions during a batch.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// Answer from the decision provider when a destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    Skip,
    SkipAll,
    AutoRename,
    AutoRenameAll,
    Overwrite,
    OverwriteAll,
    Cancel,
}

/// What to do with the single conflicting operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    Skip,
    AutoRename,
    Overwrite,
    Cancel,
}

impl ConflictChoice {
    /// Action for the current operation.
    #[must_use]
    pub const fn action(self) -> ConflictAction {
        match self {
            Self::Skip | Self::SkipAll => ConflictAction::Skip,
            Self::AutoRename | Self::AutoRenameAll => ConflictAction::AutoRename,
            Self::Overwrite | Self::OverwriteAll => ConflictAction::Overwrite,
            Self::Cancel => ConflictAction::Cancel,
        }
    }

    /// True for the choices that also apply to every later conflict.
    #[must_use]
    pub const fn is_sticky(self) -> bool {
        matches!(self, Self::SkipAll | Self::AutoRenameAll | Self::OverwriteAll)
    }
}

impl fmt::Display for ConflictChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Skip => "skip",
            Self::SkipAll => "skip_all",
            Self::AutoRename => "auto_rename",
            Self::AutoRenameAll => "auto_rename_all",
            Self::Overwrite => "overwrite",
            Self::OverwriteAll => "overwrite_all",
            Self::Cancel => "cancel",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ConflictChoice {
    type Err = String;

    /// Parse a prompt answer: a single key where uppercase means "all",
    /// or the full choice name.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "s" => Ok(Self::Skip),
            "S" => Ok(Self::SkipAll),
            "r" => Ok(Self::AutoRename),
            "R" => Ok(Self::AutoRenameAll),
            "o" => Ok(Self::Overwrite),
            "O" => Ok(Self::OverwriteAll),
            "c" | "C" => Ok(Self::Cancel),
            other => match other.to_lowercase().replace('-', "_").as_str() {
                "skip" => Ok(Self::Skip),
                "skip_all" => Ok(Self::SkipAll),
                "auto" | "auto_rename" => Ok(Self::AutoRename),
                "auto_all" | "auto_rename_all" => Ok(Self::AutoRenameAll),
                "overwrite" => Ok(Self::Overwrite),
                "overwrite_all" => Ok(Self::OverwriteAll),
                "cancel" => Ok(Self::Cancel),
                _ => Err(format!("Unknown conflict choice: '{other}'")),
            },
        }
    }
}

/// Configured handling of conflicts for a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Ask for every conflict until an "all" answer is given
    #[default]
    Ask,
    /// Skip conflicting files
    Skip,
    /// Append `_<N>` before the extension
    Auto,
    /// Replace the existing file
    Overwrite,
    /// Stop the batch at the first conflict
    Cancel,
}

impl ConflictPolicy {
    /// The fixed answer for this policy, or `None` when the user should be asked.
    #[must_use]
    pub const fn fixed_choice(self) -> Option<ConflictChoice> {
        match self {
            Self::Ask => None,
            Self::Skip => Some(ConflictChoice::SkipAll),
            Self::Auto => Some(ConflictChoice::AutoRenameAll),
            Self::Overwrite => Some(ConflictChoice::OverwriteAll),
            Self::Cancel => Some(ConflictChoice::Cancel),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ask => "ask",
            Self::Skip => "skip",
            Self::Auto => "auto",
            Self::Overwrite => "overwrite",
            Self::Cancel => "cancel",
        };
        write!(f, "{name}")
    }
}

/// Decision provider consulted when a destination already exists.
///
/// The call blocks the batch until an answer is returned.
pub trait ConflictResolver {
    fn resolve_conflict(&mut self, file_name: &str) -> ConflictChoice;
}

/// Per-batch conflict state: remembers a sticky "all" answer.
#[derive(Debug, Default)]
pub struct ConflictState {
    sticky: Option<ConflictChoice>,
}

impl ConflictState {
    #[must_use]
    pub const fn new() -> Self {
        Self { sticky: None }
    }

    /// Decide the action for a conflict on `file_name`,
    /// asking the resolver only if no sticky choice has been made yet.
    pub fn decide<R: ConflictResolver + ?Sized>(&mut self, resolver: &mut R, file_name: &str) -> ConflictAction {
        if let Some(choice) = self.sticky {
            return choice.action();
        }
        let choice = resolver.resolve_conflict(file_name);
        if choice.is_sticky() {
            self.sticky = Some(choice);
        }
        choice.action()
    }

    #[must_use]
    pub const fn sticky(&self) -> Option<ConflictChoice> {
        self.sticky
    }
}

/// Smallest `<stem>_<N>.<ext>` path with `N >= 1` that does not exist yet.
#[must_use]
pub fn auto_suffix_path(path: &Path) -> PathBuf {
    let mut counter: u64 = 1;
    loop {
        let candidate = crate::insert_suffix_before_extension(path, &format!("_{counter}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
