//! Snapshot baseline reduction
//!
//! A top-level directory carrying a `.snapshot` marker is a consolidated
//! baseline. Everything ordered before a baseline can be skipped for a
//! database initialized from it.

use crate::model::{AppliedMigration, MigrationFile};

/// Location of one contiguous snapshot run in an ordered file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRun {
    /// Index of the first file of the run
    pub start: usize,

    /// Top-level directory shared by the run (`""` for the root itself)
    pub dir: String,
}

/// Every maximal run of snapshot-tagged files sharing one top-level
/// directory, newest first
///
/// A run ends at an untagged file or at a tagged file from another
/// top-level directory.
pub fn snapshot_runs(files: &[MigrationFile]) -> Vec<SnapshotRun> {
    let mut runs: Vec<SnapshotRun> = Vec::new();
    let mut open = false;

    for (idx, file) in files.iter().enumerate().rev() {
        if !file.is_snapshot_group {
            open = false;
            continue;
        }

        match runs.last_mut() {
            Some(run) if open && run.dir == file.top_level_dir() => run.start = idx,
            _ => runs.push(SnapshotRun {
                start: idx,
                dir: file.top_level_dir().to_string(),
            }),
        }
        open = true;
    }

    runs
}

/// Find the last snapshot run
///
/// Untagged files ordered after it are skipped over.
pub fn find_last_snapshot(files: &[MigrationFile]) -> Option<SnapshotRun> {
    snapshot_runs(files).into_iter().next()
}

/// Drop every file ordered before the last snapshot run
///
/// Returns the snapshot's top-level directory when files were dropped. A list
/// without tagged files is left unchanged.
pub fn reduce_to_last_snapshot(files: &mut Vec<MigrationFile>) -> Option<String> {
    let run = find_last_snapshot(files)?;
    files.drain(..run.start);
    Some(run.dir)
}

/// Apply the snapshot reduction only where it agrees with the ledger
///
/// A fresh ledger starts from the last baseline. A ledger whose first row is
/// the first file of some baseline keeps reconciling from that baseline,
/// even after newer ones were added. A ledger that predates every baseline
/// reconciles against the full list.
pub fn apply_snapshot_baseline(
    files: &mut Vec<MigrationFile>,
    history: &[AppliedMigration],
) -> Option<String> {
    let mut runs = snapshot_runs(files).into_iter();

    let run = match history.first() {
        None => runs.next()?,
        Some(first) => runs.find(|run| files[run.start].path == first.path)?,
    };

    files.drain(..run.start);
    Some(run.dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, snapshot: bool) -> MigrationFile {
        let f = MigrationFile::new(path, "h");
        if snapshot {
            f.in_snapshot_group()
        } else {
            f
        }
    }

    fn paths(files: &[MigrationFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_no_snapshot_leaves_list_unchanged() {
        let mut files = vec![file("a/file1.sql", false), file("b/file2.sql", false)];

        assert_eq!(reduce_to_last_snapshot(&mut files), None);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_single_snapshot_directory() {
        let mut files = vec![
            file("a/file1.sql", false),
            file("b/file2.sql", true),
            file("b/file3.sql", true),
            file("c/file4.sql", false),
        ];

        assert_eq!(reduce_to_last_snapshot(&mut files), Some("b".to_string()));
        assert_eq!(
            paths(&files),
            vec!["b/file2.sql", "b/file3.sql", "c/file4.sql"]
        );
    }

    #[test]
    fn test_adjacent_snapshot_directory_does_not_extend_run() {
        let mut files = vec![
            file("subdir3/x.sql", false),
            file("subdir4/init1.sql", true),
            file("subdir4/init2.sql", true),
            file("subdir5/init1.sql", true),
            file("subdir5/init2.sql", true),
            file("subdir6/justanother.sql", false),
        ];

        assert_eq!(
            reduce_to_last_snapshot(&mut files),
            Some("subdir5".to_string())
        );
        assert_eq!(
            paths(&files),
            vec![
                "subdir5/init1.sql",
                "subdir5/init2.sql",
                "subdir6/justanother.sql"
            ]
        );
    }

    #[test]
    fn test_earlier_non_contiguous_snapshot_is_ignored() {
        let mut files = vec![
            file("a/1.sql", true),
            file("b/2.sql", false),
            file("c/3.sql", true),
            file("c/4.sql", true),
        ];

        assert_eq!(reduce_to_last_snapshot(&mut files), Some("c".to_string()));
        assert_eq!(paths(&files), vec!["c/3.sql", "c/4.sql"]);
    }

    #[test]
    fn test_root_level_snapshot_group() {
        let mut files = vec![
            file("a/1.sql", false),
            file("2.sql", true),
            file("3.sql", true),
        ];

        assert_eq!(reduce_to_last_snapshot(&mut files), Some(String::new()));
        assert_eq!(paths(&files), vec!["2.sql", "3.sql"]);
    }

    #[test]
    fn test_baseline_honoured_on_fresh_ledger() {
        let mut files = vec![file("a/1.sql", false), file("b/2.sql", true)];

        assert_eq!(
            apply_snapshot_baseline(&mut files, &[]),
            Some("b".to_string())
        );
        assert_eq!(paths(&files), vec!["b/2.sql"]);
    }

    #[test]
    fn test_baseline_honoured_when_ledger_starts_at_it() {
        let mut files = vec![
            file("a/1.sql", false),
            file("b/2.sql", true),
            file("b/3.sql", true),
        ];
        let history = vec![AppliedMigration::new("b/2.sql", "h")];

        assert_eq!(
            apply_snapshot_baseline(&mut files, &history),
            Some("b".to_string())
        );
        assert_eq!(paths(&files), vec!["b/2.sql", "b/3.sql"]);
    }

    #[test]
    fn test_runs_listed_newest_first() {
        let files = vec![
            file("a/1.sql", false),
            file("b/2.sql", true),
            file("c/3.sql", false),
            file("d/4.sql", true),
            file("e/5.sql", true),
        ];

        let runs = snapshot_runs(&files);

        assert_eq!(
            runs,
            vec![
                SnapshotRun { start: 4, dir: "e".to_string() },
                SnapshotRun { start: 3, dir: "d".to_string() },
                SnapshotRun { start: 1, dir: "b".to_string() },
            ]
        );
    }

    #[test]
    fn test_older_baseline_honoured_after_newer_one_added() {
        let mut files = vec![
            file("a/1.sql", false),
            file("b/2.sql", true),
            file("c/3.sql", false),
            file("d/4.sql", true),
        ];
        let history = vec![
            AppliedMigration::new("b/2.sql", "h"),
            AppliedMigration::new("c/3.sql", "h"),
        ];

        assert_eq!(
            apply_snapshot_baseline(&mut files, &history),
            Some("b".to_string())
        );
        assert_eq!(paths(&files), vec!["b/2.sql", "c/3.sql", "d/4.sql"]);
    }

    #[test]
    fn test_baseline_ignored_when_ledger_predates_it() {
        let mut files = vec![file("a/1.sql", false), file("b/2.sql", true)];
        let history = vec![AppliedMigration::new("a/1.sql", "h")];

        assert_eq!(apply_snapshot_baseline(&mut files, &history), None);
        assert_eq!(files.len(), 2);
    }
}
