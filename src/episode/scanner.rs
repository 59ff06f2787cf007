//! Recursive discovery of video files carrying an episode token.

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::episode::{Candidate, CandidateId, EpisodeToken, RenameError};

/// Video file extensions considered by default.
pub static VIDEO_EXTENSIONS: [&str; 4] = ["mkv", "mp4", "avi", "mov"];

/// Why a directory entry did not become a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmissionReason {
    UnsupportedExtension,
    NoEpisodeToken,
    NonUnicodeName,
    Unreadable(String),
}

impl fmt::Display for OmissionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedExtension => write!(f, "unsupported extension"),
            Self::NoEpisodeToken => write!(f, "no season/episode tag"),
            Self::NonUnicodeName => write!(f, "filename is not valid unicode"),
            Self::Unreadable(error) => write!(f, "unreadable: {error}"),
        }
    }
}

/// A file or directory entry skipped during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Omission {
    pub path: PathBuf,
    pub reason: OmissionReason,
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub candidates: Vec<Candidate>,
    pub omitted: Vec<Omission>,
}

/// Walks a directory tree and collects episode candidates.
#[derive(Debug, Clone)]
pub struct Scanner {
    extensions: Vec<String>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(VIDEO_EXTENSIONS.iter().map(std::string::ToString::to_string).collect())
    }
}

impl Scanner {
    /// Create a scanner accepting the given extensions.
    /// Extensions are matched case-insensitively and may include a leading dot.
    #[must_use]
    pub fn new(extensions: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Scan the given root directory recursively.
    ///
    /// Entries are visited in file name order so repeated scans of an unchanged tree
    /// produce the same candidate ids.
    ///
    /// # Errors
    /// Returns an error if the root is not an existing directory.
    /// Unreadable entries below the root are reported as omissions instead.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, RenameError> {
        if !root.is_dir() {
            return Err(RenameError::NotADirectory(root.to_path_buf()));
        }

        let mut result = ScanResult::default();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    let path = error.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    result.omitted.push(Omission {
                        path,
                        reason: OmissionReason::Unreadable(error.to_string()),
                    });
                    continue;
                }
            };
            // Follows links so symlinked videos are found too.
            if !entry.path().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.has_supported_extension(path) {
                result.omitted.push(Omission {
                    path: path.to_path_buf(),
                    reason: OmissionReason::UnsupportedExtension,
                });
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                result.omitted.push(Omission {
                    path: path.to_path_buf(),
                    reason: OmissionReason::NonUnicodeName,
                });
                continue;
            };

            let Some(token) = EpisodeToken::find(name) else {
                result.omitted.push(Omission {
                    path: path.to_path_buf(),
                    reason: OmissionReason::NoEpisodeToken,
                });
                continue;
            };

            let directory = path.parent().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            let id = CandidateId(result.candidates.len());
            result
                .candidates
                .push(Candidate::new(id, directory, name.to_string(), token));
        }

        Ok(result)
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}
