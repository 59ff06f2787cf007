use std::path::PathBuf;

use thiserror::Error;

/// Reasons a whole scan, batch or undo call is refused.
///
/// Every variant is raised before the filesystem is touched.
/// Failures of individual renames are reported per operation instead.
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("Increment is not a valid integer")]
    InvalidIncrement,

    #[error("Increment is 0, nothing to rename")]
    ZeroIncrement,

    #[error("No files selected for renaming")]
    NothingSelected,

    #[error("No selected file would change name")]
    NoChanges,

    #[error("Rename was not confirmed")]
    NotConfirmed,

    #[error("No directory selected")]
    NoDirectory,

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Nothing to undo")]
    NothingToUndo,
}

impl RenameError {
    /// True for refusals that only mean there was nothing to do.
    #[must_use]
    pub const fn is_empty_batch(&self) -> bool {
        matches!(
            self,
            Self::ZeroIncrement | Self::NothingSelected | Self::NoChanges | Self::NothingToUndo
        )
    }
}
