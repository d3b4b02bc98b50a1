//! Migration directory walker
//!
//! Depth-first traversal of the migration root. Each directory level builds
//! its own list and hands it back to the caller; nothing is shared across
//! recursive calls, so an error leaves no partial result behind.

use crate::classify::{is_near_miss, FileKind};
use crate::errors::{MigrunError, Result};
use crate::model::{MigrationFile, SEPARATOR};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Collect every migration file below `root`, in discovery order
///
/// Entries of one directory are visited in file-name order; subdirectory
/// contents come before the directory's own files.
pub fn walk(root: &Path) -> Result<Vec<MigrationFile>> {
    walk_dir(root, "")
}

fn walk_dir(root: &Path, rel_dir: &str) -> Result<Vec<MigrationFile>> {
    let dir = if rel_dir.is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel_dir)
    };

    // Markers are allowed in the root itself and in its direct children
    let depth = if rel_dir.is_empty() {
        0
    } else {
        rel_dir.split(SEPARATOR).count()
    };
    let allow_snapshot_marker = depth <= 1;

    let mut entries = fs::read_dir(&dir)
        .map_err(|e| MigrunError::io(&dir, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| MigrunError::io(&dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut nested = Vec::new();
    let mut local = Vec::new();
    let mut has_marker = false;

    for entry in entries {
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| MigrunError::Io {
                path: dir.display().to_string(),
                message: format!("file name {:?} is not valid UTF-8", raw),
            })?;
        let rel_path = join_rel(rel_dir, &name);

        let file_type = entry
            .file_type()
            .map_err(|e| MigrunError::io(entry.path(), e))?;
        if file_type.is_dir() {
            nested.extend(walk_dir(root, &rel_path)?);
            continue;
        }

        match FileKind::of(&name)? {
            FileKind::SqlMigration => {
                let hash = file_hash(&entry.path())?;
                local.push(MigrationFile::new(rel_path, hash));
            }
            FileKind::SnapshotMarker => {
                if !allow_snapshot_marker {
                    return Err(MigrunError::SnapshotOutOfPlace { path: rel_path });
                }
                has_marker = true;
            }
            kind if is_near_miss(&name, kind) => {
                return Err(MigrunError::InvalidFileName { path: rel_path });
            }
            FileKind::Irrelevant => {}
        }
    }

    if has_marker {
        for file in &mut local {
            file.is_snapshot_group = true;
        }
    }

    nested.extend(local);
    Ok(nested)
}

fn join_rel(rel_dir: &str, name: &str) -> String {
    if rel_dir.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", rel_dir, SEPARATOR, name)
    }
}

/// Hex-encoded SHA-256 of the raw file bytes
///
/// The bytes are hashed exactly as stored, so a leading byte-order mark is
/// part of the digest.
pub fn file_hash(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).map_err(|e| MigrunError::io(path, e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| MigrunError::io(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}
