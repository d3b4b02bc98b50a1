//! Database seam for a migration run.

use crate::errors::Result;
use crate::model::{AppliedMigration, LedgerRecord};

/// Everything a run needs from the database it migrates.
///
/// One implementation owns one connection. Calls are strictly sequential.
pub trait MigrationTarget {
    /// Create the ledger table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `MigrunError::Database` if the schema cannot be created.
    fn ensure_ledger(&mut self) -> Result<()>;

    /// Load applied migrations for one application, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `MigrunError::Database` if the ledger cannot be read.
    fn load_history(&mut self, app_id: &str) -> Result<Vec<AppliedMigration>>;

    /// Execute the text of one migration file as a single batch.
    ///
    /// # Errors
    ///
    /// Returns `MigrunError::Database` carrying the driver's message.
    fn execute_script(&mut self, sql: &str) -> Result<()>;

    /// Append one ledger row.
    ///
    /// # Errors
    ///
    /// Returns `MigrunError::Database` if the row cannot be written.
    fn record_applied(&mut self, record: &LedgerRecord<'_>) -> Result<()>;
}
