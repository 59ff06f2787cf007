//! End-to-end batches through the public session API.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use episode_bump::episode::{
    AuditLog, Candidate, CandidateId, ConflictChoice, ConflictResolver, Frontend, Level, ProgressReporter,
    RenameError, RenameStatus, Scanner, Selection, Session, UndoLog,
};

/// Frontend answering from fixed values and a queue of conflict answers.
struct ScriptedFrontend {
    root: PathBuf,
    increment: Option<i64>,
    dry_run: bool,
    answers: VecDeque<ConflictChoice>,
    conflicts: Vec<String>,
    statuses: Vec<(CandidateId, String, RenameStatus)>,
}

impl ScriptedFrontend {
    fn new(root: &Path, increment: i64, answers: &[ConflictChoice]) -> Self {
        Self {
            root: root.to_path_buf(),
            increment: Some(increment),
            dry_run: false,
            answers: answers.iter().copied().collect(),
            conflicts: Vec::new(),
            statuses: Vec::new(),
        }
    }
}

impl ConflictResolver for ScriptedFrontend {
    fn resolve_conflict(&mut self, file_name: &str) -> ConflictChoice {
        self.conflicts.push(file_name.to_string());
        self.answers.pop_front().unwrap_or(ConflictChoice::Cancel)
    }
}

impl ProgressReporter for ScriptedFrontend {
    fn report_progress(&mut self, candidate: CandidateId, displayed_name: &str, status: &RenameStatus) {
        self.statuses
            .push((candidate, displayed_name.to_string(), status.clone()));
    }
}

impl Frontend for ScriptedFrontend {
    fn select_directory(&mut self) -> Option<PathBuf> {
        Some(self.root.clone())
    }

    fn selection(&self, candidates: &[Candidate]) -> Selection {
        candidates.iter().map(Candidate::id).collect()
    }

    fn increment(&self) -> Option<i64> {
        self.increment
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

fn media_dir(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for name in names {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directory");
        }
        fs::write(&path, name).expect("Failed to write file");
    }
    dir
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(dir)
                .expect("entry under root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    names.sort();
    names
}

fn content(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).expect("Failed to read file")
}

#[test]
fn first_operation_conflicts_with_unrenamed_second_file() {
    let dir = media_dir(&["ep.S02E03.mkv", "ep.S02E04.mkv"]);
    let mut session = Session::new(Scanner::default(), AuditLog::disabled());
    let mut frontend = ScriptedFrontend::new(dir.path(), 1, &[ConflictChoice::AutoRename]);
    session.select_and_scan(&mut frontend).unwrap();

    let report = session.apply(&mut frontend).unwrap();

    assert_eq!(frontend.conflicts, vec!["ep.S02E04.mkv"]);
    assert_eq!(report.success_count, 2);
    assert_eq!(file_names(dir.path()), vec!["ep.S02E04.mkv", "ep.S02E05.mkv"]);
    assert_eq!(content(dir.path(), "ep.S02E04.mkv"), "ep.S02E03.mkv");
    assert_eq!(content(dir.path(), "ep.S02E05.mkv"), "ep.S02E04.mkv");
}

#[test]
fn undo_after_reconciled_batch_restores_every_file() {
    let names = ["ep.S02E03.mkv", "ep.S02E04.mkv", "ep.S02E05.mkv"];
    let dir = media_dir(&names);
    let mut session = Session::new(Scanner::default(), AuditLog::disabled());
    let mut frontend = ScriptedFrontend::new(dir.path(), 1, &[ConflictChoice::AutoRenameAll]);
    session.select_and_scan(&mut frontend).unwrap();

    session.apply(&mut frontend).unwrap();
    assert_eq!(
        file_names(dir.path()),
        vec!["ep.S02E04.mkv", "ep.S02E05.mkv", "ep.S02E06.mkv"]
    );
    // A sticky answer is asked only once.
    assert_eq!(frontend.conflicts.len(), 1);

    let report = session.undo().unwrap();

    assert_eq!(report.restored, 3);
    assert_eq!(file_names(dir.path()), names);
    for name in names {
        assert_eq!(content(dir.path(), name), name);
    }
}

#[test]
fn undo_after_overwrite_restores_surviving_file() {
    let dir = media_dir(&["a.S01E01.mkv", "a.S01E02.mkv"]);
    let mut session = Session::new(Scanner::default(), AuditLog::disabled());
    let mut frontend = ScriptedFrontend::new(dir.path(), 1, &[ConflictChoice::OverwriteAll]);
    session.select_and_scan(&mut frontend).unwrap();

    session.apply(&mut frontend).unwrap();
    assert_eq!(file_names(dir.path()), vec!["a.S01E03.mkv"]);

    let report = session.undo().unwrap();

    assert_eq!(report.restored, 2);
    assert_eq!(file_names(dir.path()), vec!["a.S01E01.mkv"]);
    assert_eq!(content(dir.path(), "a.S01E01.mkv"), "a.S01E01.mkv");
}

#[test]
fn negative_increment_clamps_and_keeps_width() {
    let dir = media_dir(&["Show.S01E05.720p.mkv", "Show.S03E5.mp4"]);
    let mut session = Session::new(Scanner::default(), AuditLog::disabled());
    let mut frontend = ScriptedFrontend::new(dir.path(), -10, &[]);
    session.select_and_scan(&mut frontend).unwrap();

    let rows = session.refresh_preview(&mut frontend);
    let proposed: Vec<&str> = rows.iter().map(|row| row.proposed_name.as_str()).collect();
    assert_eq!(proposed, vec!["Show.S01E00.720p.mkv", "Show.S03E0.mp4"]);

    session.apply(&mut frontend).unwrap();
    assert_eq!(file_names(dir.path()), vec!["Show.S01E00.720p.mkv", "Show.S03E0.mp4"]);
}

#[test]
fn nested_directories_are_renamed_in_place() {
    let dir = media_dir(&["Season 1/show.s01e09.mkv", "Season 2/show.S02E09.avi", "notes.S01E01.txt"]);
    let mut session = Session::new(Scanner::default(), AuditLog::disabled());
    let mut frontend = ScriptedFrontend::new(dir.path(), 1, &[]);
    session.select_and_scan(&mut frontend).unwrap();
    assert_eq!(session.candidates().len(), 2);

    session.apply(&mut frontend).unwrap();

    assert_eq!(
        file_names(dir.path()),
        vec!["Season 1/show.s01e10.mkv", "Season 2/show.S02E10.avi", "notes.S01E01.txt"]
    );
}

#[test]
fn skip_all_leaves_conflicting_files_untouched() {
    let dir = media_dir(&["a.S01E01.mkv", "a.S01E02.mkv", "b.S01E01.mkv", "b.S01E02.mkv"]);
    let mut session = Session::new(Scanner::default(), AuditLog::disabled());
    let mut frontend = ScriptedFrontend::new(dir.path(), 1, &[ConflictChoice::SkipAll]);
    session.select_and_scan(&mut frontend).unwrap();

    let report = session.apply(&mut frontend).unwrap();

    assert_eq!(frontend.conflicts.len(), 1);
    assert_eq!(report.count(&RenameStatus::ConflictSkip), 2);
    assert_eq!(report.success_count, 2);
    assert_eq!(
        file_names(dir.path()),
        vec!["a.S01E01.mkv", "a.S01E03.mkv", "b.S01E01.mkv", "b.S01E03.mkv"]
    );
}

#[test]
fn cancel_stops_the_batch() {
    let dir = media_dir(&["a.S01E01.mkv", "a.S01E02.mkv"]);
    let mut session = Session::new(Scanner::default(), AuditLog::disabled());
    let mut frontend = ScriptedFrontend::new(dir.path(), 1, &[ConflictChoice::Cancel]);
    session.select_and_scan(&mut frontend).unwrap();

    let report = session.apply(&mut frontend).unwrap();

    assert!(report.cancelled);
    assert_eq!(report.success_count, 0);
    assert_eq!(file_names(dir.path()), vec!["a.S01E01.mkv", "a.S01E02.mkv"]);
    assert!(!session.can_undo());
}

#[test]
fn zero_increment_is_refused_and_not_audited() {
    let dir = media_dir(&["media/a.S01E01.mkv"]);
    let log_path = dir.path().join("audit.log");
    let audit = AuditLog::open(&log_path, Level::Debug).unwrap();
    let mut session = Session::new(Scanner::default(), audit);
    let media = dir.path().join("media");
    let mut frontend = ScriptedFrontend::new(&media, 0, &[]);
    session.select_and_scan(&mut frontend).unwrap();
    let before = fs::read_to_string(&log_path).unwrap();

    let result = session.apply(&mut frontend);

    assert!(matches!(result, Err(RenameError::ZeroIncrement)));
    assert_eq!(fs::read_to_string(&log_path).unwrap(), before);
    assert_eq!(file_names(&media), vec!["a.S01E01.mkv"]);
}

#[test]
fn dry_run_reports_without_renaming() {
    let dir = media_dir(&["media/show.S01E02.mkv"]);
    let log_path = dir.path().join("audit.log");
    let audit = AuditLog::open(&log_path, Level::Info).unwrap();
    let mut session = Session::new(Scanner::default(), audit);
    let media = dir.path().join("media");
    let mut frontend = ScriptedFrontend::new(&media, 3, &[]);
    frontend.dry_run = true;
    session.select_and_scan(&mut frontend).unwrap();

    let report = session.apply(&mut frontend).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.count(&RenameStatus::DryRunOk), 1);
    assert_eq!(file_names(&media), vec!["show.S01E02.mkv"]);
    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("DRY RUN: Evaluated"));
    assert!(log.contains("show.S01E05.mkv"));
    assert!(!log.contains("RENAMED:"));
}

#[test]
fn undo_journal_survives_a_new_session() {
    let dir = media_dir(&["media/a.S01E01.mkv", "media/a.S01E02.mkv"]);
    let media = dir.path().join("media");
    let journal = dir.path().join("state").join("last_batch.json");

    let mut session = Session::new(Scanner::default(), AuditLog::disabled());
    let mut frontend = ScriptedFrontend::new(&media, 5, &[]);
    session.select_and_scan(&mut frontend).unwrap();
    let report = session.apply(&mut frontend).unwrap();
    report.undo_log.save(&journal).unwrap();
    drop(session);

    let mut restored = Session::new(Scanner::default(), AuditLog::disabled());
    restored.restore_undo_log(UndoLog::load(&journal).unwrap());
    let undo = restored.undo().unwrap();

    assert_eq!(undo.restored, 2);
    assert_eq!(file_names(&media), vec!["a.S01E01.mkv", "a.S01E02.mkv"]);
    assert!(matches!(restored.undo(), Err(RenameError::NothingToUndo)));
}
