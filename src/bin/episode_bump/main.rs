mod bump;
mod config;
mod terminal;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use episode_bump::episode::{ConflictPolicy, Level};

use crate::bump::EpisodeBump;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Shift episode numbers in video file names"
)]
pub struct Args {
    /// Optional root directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Episode offset, can be negative
    #[arg(
        short,
        long,
        allow_negative_numbers = true,
        value_name = "N",
        required_unless_present_any = ["undo", "completion"]
    )]
    increment: Option<i64>,

    /// Only print changes without renaming
    #[arg(short, long)]
    print: bool,

    /// Rename without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// How to handle existing target files
    #[arg(short = 'c', long, value_enum, value_name = "POLICY")]
    on_conflict: Option<ConflictPolicy>,

    /// Only rename files whose relative path contains the pattern
    #[arg(long, num_args = 1, action = clap::ArgAction::Append, value_name = "PATTERN")]
    include: Vec<String>,

    /// Skip files whose relative path contains the pattern
    #[arg(long, num_args = 1, action = clap::ArgAction::Append, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Undo the last batch
    #[arg(short, long, conflicts_with_all = ["increment", "print"])]
    undo: bool,

    /// Audit log file
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    log: Option<PathBuf>,

    /// Minimum level written to the audit log
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<Level>,

    /// Generate shell completion
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        episode_bump::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        EpisodeBump::new(args)?.run()
    }
}
