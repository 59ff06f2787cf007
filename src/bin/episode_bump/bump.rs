use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;

use episode_bump::episode::{BatchReport, RenameError, RenameStatus, Scanner, Session, UndoLog};
use episode_bump::{colorize_bool, get_relative_path_or_filename, print_warning, show_diff};

use crate::Args;
use crate::config::Config;
use crate::terminal::Terminal;

#[derive(Debug)]
pub struct EpisodeBump {
    root: PathBuf,
    config: Config,
}

impl EpisodeBump {
    pub fn new(args: Args) -> anyhow::Result<Self> {
        let root = episode_bump::resolve_root_directory(args.path.as_deref())?;
        let config = Config::from_args(args)?;
        if config.verbose {
            eprintln!("Config: {config:#?}");
            eprintln!("Root: {}", root.display());
            eprintln!("Dry run: {}", colorize_bool(config.dryrun));
        }
        Ok(Self { root, config })
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let audit = self.config.open_audit_log()?;
        let session = Session::new(Scanner::new(self.config.extensions.clone()), audit);
        if self.config.undo {
            self.undo_last_batch(session)
        } else {
            self.rename(session)
        }
    }

    fn rename(&self, mut session: Session) -> anyhow::Result<()> {
        let mut terminal = Terminal::new(self.root.clone(), &self.config);

        let candidates = session.select_and_scan(&mut terminal)?;
        if candidates.is_empty() {
            println!("No video files with an episode number found");
            return Ok(());
        }
        if self.config.verbose {
            println!("Found {} episode file(s)", candidates.len());
        }

        let rows = session.refresh_preview(&mut terminal);
        let mut pending = 0;
        for (row, candidate) in rows.iter().zip(session.candidates()) {
            if row.status == RenameStatus::Pending {
                pending += 1;
                let old = get_relative_path_or_filename(candidate.path(), &self.root);
                let new = get_relative_path_or_filename(&candidate.directory().join(&row.proposed_name), &self.root);
                show_diff(&old, &new);
            }
        }
        if pending > 0 {
            println!();
        }

        match session.apply(&mut terminal) {
            Ok(report) => {
                print_summary(&report);
                if !report.dry_run && !report.undo_log.is_empty() {
                    self.save_journal(&report.undo_log)?;
                }
                Ok(())
            }
            Err(error @ (RenameError::NotConfirmed | RenameError::InvalidIncrement)) => {
                print_warning!("{error}");
                Ok(())
            }
            Err(error) if error.is_empty_batch() => {
                print_warning!("{error}");
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    fn undo_last_batch(&self, mut session: Session) -> anyhow::Result<()> {
        let journal = journal_path()?;
        let log = UndoLog::load(&journal)?;
        if self.config.verbose {
            println!("Undo journal: {} ({} entries)", journal.display(), log.len());
        }
        session.restore_undo_log(log);

        match session.undo() {
            Ok(report) => {
                remove_journal(&journal)?;
                let message = format!("Restored {} of {} file(s)", report.restored, report.total);
                if report.restored == report.total {
                    println!("{}", message.green());
                } else {
                    println!("{}", message.yellow());
                }
                Ok(())
            }
            Err(error) if error.is_empty_batch() => {
                print_warning!("{error}");
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    fn save_journal(&self, log: &UndoLog) -> anyhow::Result<()> {
        let journal = journal_path()?;
        log.save(&journal)?;
        if self.config.verbose {
            println!("Saved undo journal: {}", journal.display());
        }
        Ok(())
    }
}

fn journal_path() -> anyhow::Result<PathBuf> {
    UndoLog::default_journal_path().context("Failed to determine data directory for the undo journal")
}

fn remove_journal(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error).with_context(|| format!("Failed to remove undo journal {}", path.display())),
    }
}

fn print_summary(report: &BatchReport) {
    if report.dry_run {
        println!(
            "{}",
            format!("[DRY RUN] {} file(s) would be renamed", report.success_count).cyan()
        );
        return;
    }

    let skipped = report.count(&RenameStatus::ConflictSkip);
    let errors = report.error_count();
    let message = format!(
        "Renamed {} of {} file(s), {skipped} skipped, {errors} failed",
        report.success_count, report.total
    );
    if errors > 0 {
        println!("{}", message.red());
    } else if skipped > 0 || report.cancelled {
        println!("{}", message.yellow());
    } else {
        println!("{}", message.green());
    }
    if report.cancelled {
        println!("{}", "Batch cancelled on conflict".yellow());
    }
}
