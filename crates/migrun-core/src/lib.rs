//! migrun core - discovery, ordering and reconciliation of SQL migrations
//!
//! This crate holds everything that does not depend on a concrete database:
//! - Directory walking and file classification
//! - Canonical apply order
//! - Snapshot baseline reduction
//! - Reconciliation of files against the ledger
//! - Application through the `MigrationTarget` seam
//!
//! Database access lives in `migrun-store`; process concerns live in the CLI.

pub mod apply;
pub mod cancel;
pub mod classify;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod order;
pub mod reconcile;
pub mod runner;
pub mod snapshot;
pub mod target;
pub mod walk;

// Re-export commonly used types
pub use cancel::CancelToken;
pub use config::{RunConfig, StepLimit};
pub use errors::{ExError, ExErrorKind, MigrunError, Result};
pub use model::{AppliedMigration, LedgerEntry, LedgerRecord, MigrationFile};
pub use runner::{discover, migrate, RunReport};
pub use target::MigrationTarget;
