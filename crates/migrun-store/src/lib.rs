//! migrun store - SQLite persistence for migration runs
//!
//! Provides:
//! - Database URL parsing and connection setup
//! - The ledger table and the `MigrationTarget` implementation over it

pub mod db;
pub mod errors;
pub mod ledger;

// Re-export key types
pub use db::{connect, DatabaseLocation};
pub use errors::Result;
pub use ledger::{SqliteTarget, LEDGER_TABLE};
