#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{write, MemoryTarget};
use migrun_core::errors::MigrunError;
use migrun_core::logging_facility::schema::{EVENT_END, EVENT_START};
use migrun_core::logging_facility::test_capture::init_test_capture;
use migrun_core::{discover, migrate, CancelToken, RunConfig, StepLimit};
use tempfile::TempDir;

#[test]
fn test_apply_order_is_logged_per_file() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pipeline-root.sql", "SELECT 0;");
    write(dir.path(), "pipeline/a/b/001.sql", "SELECT 1;");
    write(dir.path(), "pipeline/a/002.sql", "SELECT 2;");
    let config = RunConfig::new("pipeline-log", dir.path());
    let mut target = MemoryTarget::default();

    let files = discover(dir.path()).unwrap();
    migrate(&mut target, files, &config, &CancelToken::new()).unwrap();

    let applied: Vec<String> = capture
        .files_for_op("apply")
        .into_iter()
        .filter(|f| f.starts_with("pipeline"))
        .collect();
    assert_eq!(
        applied,
        vec!["pipeline/a/b/001.sql", "pipeline/a/002.sql", "pipeline-root.sql"]
    );
    capture.assert_event_exists("migrate", EVENT_START);
    capture.assert_event_exists("migrate", EVENT_END);
}

#[test]
fn test_baseline_choice_is_logged_with_app_id() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/001.sql", "SELECT 1;");
    write(dir.path(), "b/.snapshot", "");
    write(dir.path(), "b/002.sql", "SELECT 2;");
    let config = RunConfig::new("pipeline-baseline", dir.path());
    let mut target = MemoryTarget::default();

    let files = discover(dir.path()).unwrap();
    migrate(&mut target, files, &config, &CancelToken::new()).unwrap();

    let ours: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.app_id.as_deref() == Some("pipeline-baseline"))
        .collect();
    assert!(ours.iter().any(|e| e.is("migrate", EVENT_START)));
    let baseline = ours
        .iter()
        .find(|e| e.snapshot_dir.is_some())
        .expect("baseline event");
    assert_eq!(baseline.snapshot_dir.as_deref(), Some("b"));
    assert_eq!(baseline.op.as_deref(), Some("migrate"));
}

#[test]
fn test_reordered_files_fail_loudly() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "010.sql", "SELECT 10;");
    write(dir.path(), "020.sql", "SELECT 20;");
    let config = RunConfig::new("billing", dir.path());
    let mut target = MemoryTarget::default();
    let files = discover(dir.path()).unwrap();
    migrate(&mut target, files, &config, &CancelToken::new()).unwrap();

    // A late file sorting between applied ones shifts every later position
    write(dir.path(), "015.sql", "SELECT 15;");
    let files = discover(dir.path()).unwrap();
    let err = migrate(&mut target, files, &config, &CancelToken::new()).unwrap_err();

    assert_eq!(
        err,
        MigrunError::MigrationMoved {
            path: "015.sql".to_string(),
            applied_path: "020.sql".to_string(),
        }
    );
    assert_eq!(target.scripts.len(), 2);
}

#[test]
fn test_deleted_applied_file_is_missing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "001.sql", "SELECT 1;");
    write(dir.path(), "002.sql", "SELECT 2;");
    let config = RunConfig::new("billing", dir.path());
    let mut target = MemoryTarget::default();
    let files = discover(dir.path()).unwrap();
    migrate(&mut target, files, &config, &CancelToken::new()).unwrap();

    std::fs::remove_file(dir.path().join("002.sql")).unwrap();
    let files = discover(dir.path()).unwrap();
    let err = migrate(&mut target, files, &config, &CancelToken::new()).unwrap_err();

    assert!(matches!(err, MigrunError::MigrationMissing { ref applied_path } if applied_path == "002.sql"));
}

#[test]
fn test_step_limited_baseline_continues_next_run() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "legacy/001.sql", "SELECT 1;");
    write(dir.path(), "v2/.snapshot", "");
    write(dir.path(), "v2/001-schema.sql", "SELECT 2;");
    write(dir.path(), "v2/002-seed.sql", "SELECT 3;");
    write(dir.path(), "v3/001.sql", "SELECT 4;");
    let mut target = MemoryTarget::default();

    let limited = RunConfig::new("billing", dir.path()).with_steps(StepLimit::Max(1));
    let report = migrate(
        &mut target,
        discover(dir.path()).unwrap(),
        &limited,
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(report.snapshot.as_deref(), Some("v2"));
    assert_eq!(report.applied, 1);

    let full = RunConfig::new("billing", dir.path());
    let report = migrate(
        &mut target,
        discover(dir.path()).unwrap(),
        &full,
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(report.snapshot.as_deref(), Some("v2"));
    assert_eq!(report.applied, 2);

    let paths: Vec<_> = target.rows.iter().map(|(_, m)| m.path.as_str()).collect();
    assert_eq!(paths, vec!["v2/001-schema.sql", "v2/002-seed.sql", "v3/001.sql"]);
}

#[test]
fn test_invalid_name_aborts_discovery() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "001.sql", "SELECT 1;");
    write(dir.path(), "002 add index.sql", "SELECT 2;");

    let err = discover(dir.path()).unwrap_err();

    assert_eq!(
        err,
        MigrunError::InvalidFileName {
            path: "002 add index.sql".to_string()
        }
    );
}
