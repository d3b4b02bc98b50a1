pub mod ledger;
pub mod migration;

pub use ledger::{AppliedMigration, LedgerEntry, LedgerRecord};
pub use migration::{MigrationFile, SEPARATOR};
