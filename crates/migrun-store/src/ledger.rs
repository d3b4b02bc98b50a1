//! SQLite ledger and migration target
//!
//! The ledger is one table shared by every application identity. Rows of one
//! application, ordered by id, replay the order in which its files were
//! applied.

use crate::errors::{from_rusqlite, Result};
use migrun_core::model::{AppliedMigration, LedgerEntry, LedgerRecord};
use migrun_core::MigrationTarget;
use rusqlite::{params, Connection};

/// Name of the ledger table
pub const LEDGER_TABLE: &str = "migrun_migrations";

const CREATE_LEDGER: &str = "
    CREATE TABLE IF NOT EXISTS migrun_migrations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        app_id VARCHAR(64) NOT NULL,
        file_path TEXT NOT NULL,
        file_hash VARCHAR(64) NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        tool_version TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_migrun_migrations_app_id
        ON migrun_migrations (app_id, id);
";

/// Migration target backed by one SQLite connection
pub struct SqliteTarget {
    conn: Connection,
}

impl SqliteTarget {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Release the connection
    pub fn into_inner(self) -> Connection {
        self.conn
    }

    /// Full ledger rows for one application, oldest first
    pub fn entries(&self, app_id: &str) -> Result<Vec<LedgerEntry>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, app_id, file_path, file_hash, applied_at, tool_version
                 FROM migrun_migrations WHERE app_id = ?1 ORDER BY id ASC",
            )
            .map_err(|e| from_rusqlite("ledger_entries", e))?;

        let rows = stmt
            .query_map([app_id], |row| {
                Ok(LedgerEntry {
                    id: row.get(0)?,
                    app_id: row.get(1)?,
                    path: row.get(2)?,
                    hash: row.get(3)?,
                    applied_at: row.get(4)?,
                    tool_version: row.get(5)?,
                })
            })
            .map_err(|e| from_rusqlite("ledger_entries", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("ledger_entries", e))?;

        Ok(rows)
    }
}

impl MigrationTarget for SqliteTarget {
    fn ensure_ledger(&mut self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_LEDGER)
            .map_err(|e| from_rusqlite("ensure_ledger", e))
    }

    fn load_history(&mut self, app_id: &str) -> Result<Vec<AppliedMigration>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT file_path, file_hash FROM migrun_migrations
                 WHERE app_id = ?1 ORDER BY id ASC",
            )
            .map_err(|e| from_rusqlite("load_history", e))?;

        let history = stmt
            .query_map([app_id], |row| {
                Ok(AppliedMigration::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })
            .map_err(|e| from_rusqlite("load_history", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("load_history", e))?;

        Ok(history)
    }

    /// Runs the file inside its own transaction. A failing statement rolls
    /// back everything the file did before it.
    fn execute_script(&mut self, sql: &str) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| from_rusqlite("execute_script", e))?;

        tx.execute_batch(sql)
            .map_err(|e| from_rusqlite("execute_script", e))?;

        tx.commit().map_err(|e| from_rusqlite("execute_script", e))
    }

    fn record_applied(&mut self, record: &LedgerRecord<'_>) -> Result<()> {
        let applied_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO migrun_migrations (app_id, file_path, file_hash, applied_at, tool_version)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.app_id,
                    record.path,
                    record.hash,
                    applied_at,
                    record.tool_version
                ],
            )
            .map_err(|e| from_rusqlite("record_applied", e))?;
        Ok(())
    }
}
