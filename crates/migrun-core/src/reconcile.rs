//! Reconciliation of on-disk files against the ledger
//!
//! The ledger must be a strict prefix of the ordered file list. Files are
//! matched against history entries position by position; once history runs
//! out, every remaining file is new and is marked for application until the
//! step limit is reached.

use crate::config::StepLimit;
use crate::errors::{MigrunError, Result};
use crate::model::{AppliedMigration, MigrationFile};

/// Mark the files that still need to be applied
///
/// Returns the number of files marked. Fails on the first file whose
/// position, name or content disagrees with the ledger.
pub fn reconcile(
    files: &mut [MigrationFile],
    history: &[AppliedMigration],
    steps: StepLimit,
    skip_file_validation: bool,
) -> Result<usize> {
    let mut cursor = 0;
    let mut marked = 0;

    for file in files.iter_mut() {
        if let Some(applied) = history.get(cursor) {
            cursor += 1;

            if applied.path != file.path {
                return Err(MigrunError::MigrationMoved {
                    path: file.path.clone(),
                    applied_path: applied.path.clone(),
                });
            }

            if applied.hash != file.hash && !skip_file_validation {
                return Err(MigrunError::MigrationChanged {
                    path: file.path.clone(),
                    applied_hash: applied.hash.clone(),
                    current_hash: file.hash.clone(),
                });
            }

            // already applied
            continue;
        }

        if steps.is_reached(marked) {
            break;
        }

        file.apply = true;
        marked += 1;
    }

    if let Some(applied) = history.get(cursor) {
        return Err(MigrunError::MigrationMissing {
            applied_path: applied.path.clone(),
        });
    }

    Ok(marked)
}
