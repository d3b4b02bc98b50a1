//! Run pipeline
//!
//! `discover` works on the filesystem only and can run before a connection
//! exists. `migrate` takes the discovered list and drives one target through
//! ledger setup, reconciliation and application.

use crate::apply::apply;
use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::errors::Result;
use crate::model::MigrationFile;
use crate::order::sort_files;
use crate::reconcile::reconcile;
use crate::snapshot::apply_snapshot_baseline;
use crate::target::MigrationTarget;
use crate::walk::walk;
use crate::{log_op_end, log_op_error, log_op_start};
use std::path::Path;

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Files found on disk
    pub discovered: usize,

    /// Top-level directory of the baseline used, if any
    pub snapshot: Option<String>,

    /// Files marked for application
    pub pending: usize,

    /// Files actually applied
    pub applied: usize,
}

/// Walk the migration root and return its files in apply order
///
/// # Errors
///
/// Returns the walker's error for unreadable entries, invalid names or a
/// misplaced snapshot marker.
pub fn discover(root: &Path) -> Result<Vec<MigrationFile>> {
    log_op_start!("discover", dir = %root.display());
    let start = std::time::Instant::now();

    let files = walk(root)
        .map(|mut files| {
            sort_files(&mut files);
            files
        })
        .map_err(|e| {
            log_op_error!(
                "discover",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    for file in &files {
        tracing::debug!(file = %file.path, snapshot = file.is_snapshot_group, "Found migration");
    }

    log_op_end!(
        "discover",
        duration_ms = start.elapsed().as_millis() as u64,
        count = files.len()
    );

    Ok(files)
}

/// Bring the target up to date with the discovered files
///
/// # Errors
///
/// Any failure stops the run. Files applied before the failure stay applied
/// and recorded.
pub fn migrate<T: MigrationTarget + ?Sized>(
    target: &mut T,
    files: Vec<MigrationFile>,
    config: &RunConfig,
    cancel: &CancelToken,
) -> Result<RunReport> {
    log_op_start!("migrate", app_id = %config.app_id);
    let start = std::time::Instant::now();

    let report = migrate_impl(target, files, config, cancel).map_err(|e| {
        log_op_error!(
            "migrate",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "migrate",
        duration_ms = start.elapsed().as_millis() as u64,
        applied = report.applied
    );

    Ok(report)
}

fn migrate_impl<T: MigrationTarget + ?Sized>(
    target: &mut T,
    mut files: Vec<MigrationFile>,
    config: &RunConfig,
    cancel: &CancelToken,
) -> Result<RunReport> {
    let discovered = files.len();

    cancel.check()?;
    target.ensure_ledger()?;
    let history = target.load_history(&config.app_id)?;
    tracing::debug!(applied = history.len(), "Loaded ledger history");

    let snapshot = apply_snapshot_baseline(&mut files, &history);
    if let Some(dir) = &snapshot {
        tracing::info!(
            op = "migrate",
            app_id = %config.app_id,
            snapshot_dir = %dir,
            remaining = files.len(),
            "Using snapshot baseline"
        );
    }

    let pending = reconcile(
        &mut files,
        &history,
        config.steps,
        config.skip_file_validation,
    )?;

    if pending == 0 {
        tracing::info!("Database is up to date");
    }
    for file in files.iter().filter(|f| f.apply) {
        tracing::debug!(file = %file.path, "Pending migration");
    }

    let applied = apply(target, &files, config, cancel)?;

    Ok(RunReport {
        discovered,
        snapshot,
        pending,
        applied,
    })
}
