//! Error helpers for migrun-store
//!
//! Maps driver errors onto the core taxonomy

use migrun_core::errors::MigrunError;

pub use migrun_core::errors::Result;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> MigrunError {
    MigrunError::database(op, err)
}

/// Create a configuration error for an unusable database URL
pub fn invalid_url(url: &str, reason: &str) -> MigrunError {
    MigrunError::InvalidConfig {
        reason: format!("invalid database URL '{}': {}", url, reason),
    }
}
