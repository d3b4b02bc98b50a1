//! Applicator
//!
//! Executes marked files in order and records each one in the ledger right
//! after its SQL succeeded. The first failure stops the run, so the ledger
//! always covers exactly the files that ran before it.

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::errors::{MigrunError, Result};
use crate::model::{LedgerRecord, MigrationFile};
use crate::target::MigrationTarget;
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Read a migration file as text
///
/// A leading UTF-8 byte-order mark is dropped. A UTF-16 byte-order mark
/// selects UTF-16 decoding for the rest of the file. Without a mark the file
/// must be valid UTF-8.
pub fn read_script(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| MigrunError::io(path, e))?;
    decode_script(&bytes).map_err(|message| MigrunError::Io {
        path: path.display().to_string(),
        message,
    })
}

fn decode_script(bytes: &[u8]) -> std::result::Result<String, String> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return utf8(rest);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return utf16(rest, u16::from_be_bytes);
    }
    utf8(bytes)
}

fn utf8(bytes: &[u8]) -> std::result::Result<String, String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| format!("invalid UTF-8: {}", e))
}

fn utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> std::result::Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err("truncated UTF-16 content".to_string());
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| format!("invalid UTF-16: {}", e))
}

/// Execute every marked file and append its ledger row
///
/// Returns the number of files applied.
///
/// # Errors
///
/// - `MigrationFailed` when a file's SQL fails; nothing is recorded for it.
/// - `LedgerDesync` when the SQL succeeded but the ledger row could not be
///   written.
/// - `Cancelled` when cancellation was requested before a file started.
pub fn apply<T: MigrationTarget + ?Sized>(
    target: &mut T,
    files: &[MigrationFile],
    config: &RunConfig,
    cancel: &CancelToken,
) -> Result<usize> {
    let mut applied = 0;

    for file in files.iter().filter(|f| f.apply) {
        cancel.check()?;

        tracing::info!(op = "apply", file = %file.path, "Applying migration");

        let sql = read_script(&config.migrations_dir.join(&file.path))?;

        target
            .execute_script(&sql)
            .map_err(|e| MigrunError::MigrationFailed {
                path: file.path.clone(),
                source: Box::new(e),
            })?;

        let record = LedgerRecord {
            app_id: &config.app_id,
            path: &file.path,
            hash: &file.hash,
            tool_version: &config.tool_version,
        };
        target
            .record_applied(&record)
            .map_err(|e| MigrunError::LedgerDesync {
                path: file.path.clone(),
                source: Box::new(e),
            })?;

        applied += 1;
    }

    Ok(applied)
}
