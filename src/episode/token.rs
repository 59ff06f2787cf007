//! Season and episode token found inside a filename.

use std::sync::LazyLock;

use regex::Regex;

// ASCII-only classes: `\d` and `(?i)` would also accept Unicode digits and case variants.
static RE_SEASON_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<season>[Ss][0-9]+)(?P<episode>[Ee][0-9]+)")
        .expect("Failed to create regex pattern for season and episode")
});

/// First `S<digits>E<digits>` match in a filename.
///
/// Offsets are byte offsets into the filename the token was parsed from,
/// with `start < end <= name.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeToken {
    season: String,
    prefix: char,
    digits: String,
    start: usize,
    end: usize,
}

impl EpisodeToken {
    /// Find the first season/episode token in the given filename.
    #[must_use]
    pub fn find(name: &str) -> Option<Self> {
        let captures = RE_SEASON_EPISODE.captures(name)?;
        let full = captures.get(0)?;
        let season = captures.name("season")?.as_str();
        let episode = captures.name("episode")?.as_str();
        let mut chars = episode.chars();
        let prefix = chars.next()?;
        Some(Self {
            season: season.to_string(),
            prefix,
            digits: chars.as_str().to_string(),
            start: full.start(),
            end: full.end(),
        })
    }

    /// Season part including its letter, for example `S03`.
    #[must_use]
    pub fn season(&self) -> &str {
        &self.season
    }

    /// Episode letter as written in the filename, `E` or `e`.
    #[must_use]
    pub const fn prefix(&self) -> char {
        self.prefix
    }

    /// Episode digit run, zero padding included.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Episode number, or `None` if the digit run does not fit into `u64`.
    #[must_use]
    pub fn episode_number(&self) -> Option<u64> {
        self.digits.parse().ok()
    }

    /// Same token with a different episode digit run, at the same start offset.
    #[must_use]
    pub fn with_digits(&self, digits: String) -> Self {
        let end = self.start + self.season.len() + self.prefix.len_utf8() + digits.len();
        Self {
            season: self.season.clone(),
            prefix: self.prefix,
            digits,
            start: self.start,
            end,
        }
    }
}
