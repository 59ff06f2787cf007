use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;

use episode_bump::episode::{
    Candidate, CandidateId, ConflictChoice, ConflictPolicy, ConflictResolver, Frontend, ProgressReporter,
    RenameStatus, Selection,
};
use episode_bump::get_relative_path_or_filename;

use crate::config::Config;

/// Command line front end: answers from flags and the config,
/// and prompts on stdin when it has to ask.
pub struct Terminal<R: BufRead> {
    root: PathBuf,
    input: R,
    increment: Option<i64>,
    dry_run: bool,
    yes: bool,
    policy: ConflictPolicy,
    include: Vec<String>,
    exclude: Vec<String>,
    verbose: bool,
}

impl Terminal<io::StdinLock<'static>> {
    pub fn new(root: PathBuf, config: &Config) -> Self {
        Self::with_input(root, config, io::stdin().lock())
    }
}

impl<R: BufRead> Terminal<R> {
    pub fn with_input(root: PathBuf, config: &Config, input: R) -> Self {
        Self {
            root,
            input,
            increment: config.increment,
            dry_run: config.dryrun,
            yes: config.yes,
            policy: config.on_conflict,
            include: config.include.clone(),
            exclude: config.exclude.clone(),
            verbose: config.verbose,
        }
    }

    /// Read one trimmed line. Returns `None` at end of input.
    fn read_answer(&mut self) -> Option<String> {
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// Candidate is included by the patterns if no include pattern is given or one matches,
    /// and no exclude pattern matches.
    fn is_selected(&self, path: &Path) -> bool {
        let relative = get_relative_path_or_filename(path, &self.root).to_lowercase();
        let included = self.include.is_empty() || self.include.iter().any(|pattern| relative.contains(pattern));
        included && !self.exclude.iter().any(|pattern| relative.contains(pattern))
    }
}

impl<R: BufRead> ConflictResolver for Terminal<R> {
    fn resolve_conflict(&mut self, file_name: &str) -> ConflictChoice {
        if let Some(choice) = self.policy.fixed_choice() {
            return choice;
        }
        loop {
            println!("{} {}", "Target already exists:".yellow(), file_name.bold());
            print!(
                "  {} ",
                "[s]kip, [r]ename with suffix, [o]verwrite, [c]ancel (uppercase applies to all):".magenta()
            );
            let Some(answer) = self.read_answer() else {
                return ConflictChoice::Cancel;
            };
            match answer.parse::<ConflictChoice>() {
                Ok(choice) => return choice,
                Err(error) => episode_bump::print_warning!("{error}"),
            }
        }
    }
}

impl<R: BufRead> ProgressReporter for Terminal<R> {
    fn report_progress(&mut self, candidate: CandidateId, displayed_name: &str, status: &RenameStatus) {
        match status {
            RenameStatus::Success => println!("{} {displayed_name}", "✓".green()),
            RenameStatus::DryRunOk => println!("{} {displayed_name}", status.to_string().cyan()),
            RenameStatus::ConflictSkip => println!("{} {displayed_name}", status.to_string().yellow()),
            RenameStatus::Error(reason) => {
                println!("{} {displayed_name}: {reason}", status.to_string().red());
            }
            RenameStatus::Pending | RenameStatus::NoChange | RenameStatus::Skipped => {
                if self.verbose {
                    println!("{} {displayed_name} {}", candidate.to_string().dimmed(), status.to_string().dimmed());
                }
            }
        }
    }
}

impl<R: BufRead> Frontend for Terminal<R> {
    fn select_directory(&mut self) -> Option<PathBuf> {
        Some(self.root.clone())
    }

    fn selection(&self, candidates: &[Candidate]) -> Selection {
        candidates
            .iter()
            .filter(|candidate| self.is_selected(candidate.path()))
            .map(Candidate::id)
            .collect()
    }

    fn increment(&self) -> Option<i64> {
        self.increment
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.yes {
            return true;
        }
        println!("{message}");
        print!("{}", "Proceed? (y/n): ".magenta());
        self.read_answer()
            .is_some_and(|answer| answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}
