/// A migration as recorded in the ledger, in the shape the reconciler needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// Root-relative path as applied
    pub path: String,

    /// Content hash at time of application
    pub hash: String,
}

impl AppliedMigration {
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: hash.into(),
        }
    }
}

/// Full ledger row
///
/// Rows for one application identity are ordered by `id`, which equals the
/// historical apply order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Monotonic row id
    pub id: i64,

    /// Application identity the row belongs to
    pub app_id: String,

    /// Root-relative path as applied
    pub path: String,

    /// Content hash at time of application
    pub hash: String,

    /// Application timestamp as stored
    pub applied_at: String,

    /// Version of the tool that applied the file
    pub tool_version: String,
}

/// Row to append after a migration file executed successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerRecord<'a> {
    pub app_id: &'a str,
    pub path: &'a str,
    pub hash: &'a str,
    pub tool_version: &'a str,
}
