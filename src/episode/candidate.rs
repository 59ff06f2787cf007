use std::fmt;
use std::path::{Path, PathBuf};

use crate::episode::EpisodeToken;

/// Index of a candidate within one scan result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(pub usize);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// A video file with an episode token, as discovered by a scan.
///
/// The path, name and token track the file on disk:
/// they are updated whenever the file is renamed within the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    id: CandidateId,
    path: PathBuf,
    directory: PathBuf,
    original_name: String,
    token: EpisodeToken,
}

impl Candidate {
    #[must_use]
    pub fn new(id: CandidateId, directory: PathBuf, name: String, token: EpisodeToken) -> Self {
        Self {
            id,
            path: directory.join(&name),
            directory,
            original_name: name,
            token,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CandidateId {
        self.id
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Current filename.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    #[must_use]
    pub const fn token(&self) -> &EpisodeToken {
        &self.token
    }

    /// Record a completed rename within the same directory.
    ///
    /// The token offsets stay valid for suffixed names
    /// since the suffix goes after the token, before the extension.
    pub fn apply_rename(&mut self, name: String, token: EpisodeToken) {
        self.path = self.directory.join(&name);
        self.original_name = name;
        self.token = token;
    }
}
