//! Canonical apply order
//!
//! Paths are compared segment by segment. Directory segments are compared
//! pairwise up to the shallower path's directory depth. When those agree,
//! paths of equal depth are ordered by file name and otherwise the deeper
//! path comes first. The result is directory-grouped and file-name sorted,
//! with nested directories applied before their parent's own files.

use crate::model::{MigrationFile, SEPARATOR};
use std::cmp::Ordering;

/// Compare two root-relative paths in apply order
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    let sa: Vec<&str> = a.split(SEPARATOR).collect();
    let sb: Vec<&str> = b.split(SEPARATOR).collect();
    compare_segments(&sa, &sb)
}

fn compare_segments<S: AsRef<str>>(sa: &[S], sb: &[S]) -> Ordering {
    let (la, lb) = (sa.len(), sb.len());
    let shared_dirs = la.min(lb) - 1;

    for (da, db) in sa.iter().zip(sb.iter()).take(shared_dirs) {
        match da.as_ref().cmp(db.as_ref()) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    if la == lb {
        sa[la - 1].as_ref().cmp(sb[lb - 1].as_ref())
    } else {
        // deeper path first
        lb.cmp(&la)
    }
}

/// Sort files into apply order in place
pub fn sort_files(files: &mut [MigrationFile]) {
    files.sort_by_cached_key(|f| PathKey(f.segments().map(str::to_owned).collect()));
}

/// Sort key carrying the pre-split path
#[derive(PartialEq, Eq)]
struct PathKey(Vec<String>);

impl PartialOrd for PathKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_segments(&self.0, &other.0)
    }
}
