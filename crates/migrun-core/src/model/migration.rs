/// One SQL migration file discovered under the migration root
///
/// Each file:
/// - Is identified by its root-relative `path` (always `/`-separated)
/// - Carries the SHA-256 of its raw bytes, BOM included
/// - Knows whether its directory carries a `.snapshot` marker
/// - Is marked for application by the reconciler only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Path relative to the migration root, `/`-separated, unique within a run
    pub path: String,

    /// Hex-encoded SHA-256 of the raw file bytes (64 chars)
    pub hash: String,

    /// True if the containing directory holds a `.snapshot` marker
    pub is_snapshot_group: bool,

    /// Set by the reconciler when this file must be applied in this run
    pub apply: bool,
}

impl MigrationFile {
    /// Create a file entry that is not part of a snapshot group and not marked
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: hash.into(),
            is_snapshot_group: false,
            apply: false,
        }
    }

    /// Builder: tag this file as part of a snapshot group
    pub fn in_snapshot_group(mut self) -> Self {
        self.is_snapshot_group = true;
        self
    }

    /// Path segments split on the normalized separator
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(SEPARATOR)
    }

    /// Top-level directory of this file, or `""` for files directly in the root
    pub fn top_level_dir(&self) -> &str {
        match self.path.split_once(SEPARATOR) {
            Some((top, _)) => top,
            None => "",
        }
    }
}

/// Normalized separator used in `MigrationFile::path`
pub const SEPARATOR: char = '/';
