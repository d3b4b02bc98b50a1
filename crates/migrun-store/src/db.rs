//! Database connection management
//!
//! Resolves the configured URL, opens the connection and checks it is usable

use crate::errors::{from_rusqlite, invalid_url, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

const SCHEME: &str = "sqlite:";
const MEMORY_URL: &str = "sqlite::memory:";

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parse `sqlite::memory:`, `sqlite://relative/path` or `sqlite:///absolute/path`
    pub fn parse(url: &str) -> Result<Self> {
        if url == MEMORY_URL {
            return Ok(DatabaseLocation::Memory);
        }

        let rest = url
            .strip_prefix(SCHEME)
            .ok_or_else(|| invalid_url(url, "only sqlite: URLs are supported"))?;
        let path = rest
            .strip_prefix("//")
            .ok_or_else(|| invalid_url(url, "expected sqlite://<path>"))?;
        if path.is_empty() {
            return Err(invalid_url(url, "database path is empty"));
        }

        Ok(DatabaseLocation::File(PathBuf::from(path)))
    }
}

/// Open a database at the given location
pub fn open(location: &DatabaseLocation) -> Result<Connection> {
    match location {
        DatabaseLocation::Memory => Connection::open_in_memory(),
        DatabaseLocation::File(path) => Connection::open(path),
    }
    .map_err(|e| from_rusqlite("open", e))
}

/// Configure a connection for a migration run
///
/// `busy_timeout` bounds how long a statement waits on another writer's lock.
pub fn configure(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| from_rusqlite("configure", e))?;
    conn.busy_timeout(busy_timeout)
        .map_err(|e| from_rusqlite("configure", e))?;
    Ok(())
}

/// Round-trip a trivial query
pub fn ping(conn: &Connection) -> Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map_err(|e| from_rusqlite("ping", e))?;
    Ok(())
}

/// Open, configure and ping in one go
pub fn connect(url: &str, timeout: Duration) -> Result<Connection> {
    let location = DatabaseLocation::parse(url)?;
    let conn = open(&location)?;
    configure(&conn, timeout)?;
    ping(&conn)?;
    tracing::debug!(?location, "Connected to database");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrun_core::errors::MigrunError;
    use tempfile::TempDir;

    #[test]
    fn test_parse_memory_url() {
        assert_eq!(
            DatabaseLocation::parse("sqlite::memory:").unwrap(),
            DatabaseLocation::Memory
        );
    }

    #[test]
    fn test_parse_relative_and_absolute_paths() {
        assert_eq!(
            DatabaseLocation::parse("sqlite://data/app.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("data/app.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite:///var/lib/app.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("/var/lib/app.db"))
        );
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        for url in ["postgres://localhost/db", "sqlite:app.db", "sqlite://", ""] {
            assert!(
                matches!(
                    DatabaseLocation::parse(url),
                    Err(MigrunError::InvalidConfig { .. })
                ),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_connect_enables_foreign_keys() {
        let conn = connect(MEMORY_URL, Duration::from_secs(1)).unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_connect_creates_file_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        let url = format!("sqlite://{}", path.display());

        connect(&url, Duration::from_secs(1)).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_connect_missing_parent_dir_fails() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}/missing/app.db", dir.path().display());

        let err = connect(&url, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, MigrunError::Database { .. }));
    }
}
