//! Directory Entry Model
//!
//! The uniform shape every listing, search, and resolve operation
//! returns: a named file or directory with its logical path. Directory
//! entries are derived from common prefixes, so their size and
//! timestamp carry no authoritative backend value.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::paths;

/// Discriminates files from derived directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One file or directory in the presented hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Base name, never empty and never containing `/`
    pub name: String,
    /// Absolute logical path of the entry
    pub path: String,
    /// Real object size for files; always 0 for directories
    pub size: u64,
    pub last_modified_date_time: DateTime<Utc>,
    pub kind: EntryKind,
}

impl Entry {
    /// File entry at a logical path with its object metadata.
    pub fn file(path: &str, size: u64, modified_at: DateTime<Utc>) -> Self {
        Self {
            name: paths::base_name(path).to_string(),
            path: path.to_string(),
            size,
            last_modified_date_time: modified_at,
            kind: EntryKind::File,
        }
    }

    /// Directory entry at a logical path. Prefixes carry no metadata,
    /// so size is fixed at 0 and the timestamp is simply "now".
    pub fn directory(path: &str) -> Self {
        Self {
            name: paths::base_name(path).to_string(),
            path: path.to_string(),
            size: 0,
            last_modified_date_time: Utc::now(),
            kind: EntryKind::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// One page of directory entries plus the continuation cursor when the
/// listing is not yet exhausted.
#[derive(Debug, Clone)]
pub struct Page {
    pub entries: Vec<Entry>,
    pub next_cursor: Option<String>,
}

/// Stable, case-sensitive name ordering for consumers that want a
/// deterministic view; the backend's own order is kept otherwise.
pub fn sort_entries_by_name(entries: &mut [Entry]) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
}
