//! Directory entry classification
//!
//! Classification is derived from the file name alone.

use crate::errors::{MigrunError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Name of the snapshot marker file
pub const SNAPSHOT_MARKER: &str = ".snapshot";

/// Extension every migration file carries
pub const SQL_EXTENSION: &str = ".sql";

const MIGRATION_NAME_PATTERN: &str = r"^[a-z0-9]+[a-z0-9_-]*\.sql$";

/// What a directory entry name means to the walker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Lowercase alphanumeric start, then `[a-z0-9_-]*`, then `.sql`
    SqlMigration,
    /// Exactly `.snapshot`
    SnapshotMarker,
    /// Anything else
    Irrelevant,
}

impl FileKind {
    /// Classify a file name (not a path)
    ///
    /// # Errors
    ///
    /// Returns `MigrunError::Internal` if the name pattern fails to compile.
    pub fn of(name: &str) -> Result<Self> {
        static MIGRATION_NAME: OnceLock<Result<Regex>> = OnceLock::new();
        let pattern = MIGRATION_NAME
            .get_or_init(|| compile(MIGRATION_NAME_PATTERN))
            .as_ref()
            .map_err(Clone::clone)?;

        let kind = if pattern.is_match(name) {
            FileKind::SqlMigration
        } else if name == SNAPSHOT_MARKER {
            FileKind::SnapshotMarker
        } else {
            FileKind::Irrelevant
        };
        Ok(kind)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| MigrunError::Internal {
        message: format!("bad file name pattern {}: {}", pattern, e),
    })
}

/// True for names that look like a migration but break the naming rule
///
/// Such a name is almost certainly a typo; the walker refuses to skip it.
pub fn is_near_miss(name: &str, kind: FileKind) -> bool {
    kind == FileKind::Irrelevant && name.ends_with(SQL_EXTENSION)
}
