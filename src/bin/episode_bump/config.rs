use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use itertools::Itertools;
use serde::Deserialize;

use episode_bump::episode::{AuditLog, ConflictPolicy, Level, VIDEO_EXTENSIONS};

use crate::Args;

/// Final config created from CLI arguments and user config file.
#[derive(Debug, Default)]
pub struct Config {
    pub(crate) dryrun: bool,
    pub(crate) exclude: Vec<String>,
    pub(crate) extensions: Vec<String>,
    pub(crate) include: Vec<String>,
    pub(crate) increment: Option<i64>,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) log_level: Level,
    pub(crate) on_conflict: ConflictPolicy,
    pub(crate) undo: bool,
    pub(crate) verbose: bool,
    pub(crate) yes: bool,
}

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
struct EpisodeBumpConfig {
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    log_file: Option<PathBuf>,
    #[serde(default)]
    log_level: Option<Level>,
    #[serde(default)]
    on_conflict: Option<ConflictPolicy>,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    yes: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    episode_bump: EpisodeBumpConfig,
}

impl EpisodeBumpConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = episode_bump::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.episode_bump)
            .context("Failed to parse episode_bump config TOML")
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed.
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let user_config = EpisodeBumpConfig::get_user_config()?;
        Ok(Self::combine(args, user_config))
    }

    /// Merge args over the user config (args > config > defaults).
    fn combine(args: Args, user_config: EpisodeBumpConfig) -> Self {
        let extensions = if user_config.extensions.is_empty() {
            VIDEO_EXTENSIONS.iter().map(std::string::ToString::to_string).collect()
        } else {
            user_config.extensions
        };

        let include = user_config
            .include
            .into_iter()
            .chain(args.include)
            .map(|pattern| pattern.to_lowercase())
            .unique()
            .collect();
        let exclude = user_config
            .exclude
            .into_iter()
            .chain(args.exclude)
            .map(|pattern| pattern.to_lowercase())
            .unique()
            .collect();

        Self {
            dryrun: args.print || user_config.dryrun,
            exclude,
            extensions,
            include,
            increment: args.increment,
            log_file: args.log.or(user_config.log_file).map(expand_home),
            log_level: args.log_level.or(user_config.log_level).unwrap_or_default(),
            on_conflict: args.on_conflict.or(user_config.on_conflict).unwrap_or_default(),
            undo: args.undo,
            verbose: args.verbose || user_config.verbose,
            yes: args.yes || user_config.yes,
        }
    }

    /// Open the audit log from the configured or default location.
    ///
    /// # Errors
    /// Returns an error if the log file cannot be opened.
    pub fn open_audit_log(&self) -> anyhow::Result<AuditLog> {
        match self.log_file.clone().or_else(AuditLog::default_path) {
            Some(path) => AuditLog::open(&path, self.log_level),
            None => Ok(AuditLog::disabled()),
        }
    }
}

/// Replace a leading `~` with the home directory.
fn expand_home(path: PathBuf) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path
}

#[cfg(test)]
mod episode_bump_config_tests {
    use super::*;

    #[test]
    fn from_toml_str_parses_empty_config() {
        let config = EpisodeBumpConfig::from_toml_str("").unwrap();
        assert!(!config.dryrun);
        assert!(!config.yes);
        assert!(config.on_conflict.is_none());
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn from_toml_str_parses_episode_bump_section() {
        let toml = r#"
[episode_bump]
dryrun = true
yes = true
verbose = true
on_conflict = "auto"
log_level = "warning"
log_file = "/tmp/episodes.log"
"#;
        let config = EpisodeBumpConfig::from_toml_str(toml).unwrap();
        assert!(config.dryrun);
        assert!(config.yes);
        assert!(config.verbose);
        assert_eq!(config.on_conflict, Some(ConflictPolicy::Auto));
        assert_eq!(config.log_level, Some(Level::Warning));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/episodes.log")));
    }

    #[test]
    fn from_toml_str_parses_lists() {
        let toml = r#"
[episode_bump]
extensions = ["mkv", "webm"]
include = ["Season 1"]
exclude = ["sample"]
"#;
        let config = EpisodeBumpConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.extensions, vec!["mkv", "webm"]);
        assert_eq!(config.include, vec!["Season 1"]);
        assert_eq!(config.exclude, vec!["sample"]);
    }

    #[test]
    fn from_toml_str_unknown_policy_returns_error() {
        let toml = r#"
[episode_bump]
on_conflict = "rename"
"#;
        assert!(EpisodeBumpConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn from_toml_str_invalid_toml_returns_error() {
        assert!(EpisodeBumpConfig::from_toml_str("this is not valid toml {{{").is_err());
    }

    #[test]
    fn from_toml_str_ignores_other_sections() {
        let toml = r"
[flip_date]
verbose = true

[episode_bump]
yes = true
";
        let config = EpisodeBumpConfig::from_toml_str(toml).unwrap();
        assert!(config.yes);
        assert!(!config.verbose);
    }
}
