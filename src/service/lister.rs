//! Directory Lister
//!
//! Turns one page of a prefix-delimited listing into directory entries
//! plus a continuation cursor, and resolves whether a logical path names
//! an existing file object. All paths handled here are already
//! normalized by the path codec.

use log::debug;
use std::sync::Arc;

use crate::error::{IndexError, Result};
use crate::gateway::ObjectStoreGateway;
use crate::paths;
use crate::service::entry::{Entry, Page};

/// Head-probes a logical path for an existing file object. The root and
/// anything whose key ends in `/` can never be a file.
pub(crate) async fn probe_file(
    gateway: &dyn ObjectStoreGateway,
    path: &str,
) -> Result<Option<Entry>> {
    let key = paths::to_key(path);
    if key.is_empty() || key.ends_with('/') {
        return Ok(None);
    }
    match gateway.head(key).await? {
        Some(meta) => Ok(Some(Entry::file(path, meta.size, meta.modified_at))),
        None => Ok(None),
    }
}

/// Paginated directory listing over the object store gateway.
pub struct DirectoryLister {
    gateway: Arc<dyn ObjectStoreGateway>,
    page_size: usize,
}

impl DirectoryLister {
    pub fn new(gateway: Arc<dyn ObjectStoreGateway>, page_size: usize) -> Self {
        Self { gateway, page_size }
    }

    /// Resolve a logical path to a file entry, or `None` when no object
    /// exists at its key. Callers branch on this before asking for a
    /// directory page.
    pub async fn resolve(&self, path: &str) -> Result<Option<Entry>> {
        probe_file(self.gateway.as_ref(), path).await
    }

    /// Fetch one page of entries for the directory at `path`. An empty
    /// or blank cursor means the first page.
    pub async fn list_page(&self, path: &str, cursor: Option<&str>) -> Result<Page> {
        // A file has no directory page
        if self.resolve(path).await?.is_some() {
            return Err(IndexError::InvalidPath(format!(
                "{} is a file, not a directory",
                path
            )));
        }

        let prefix = paths::to_prefix(paths::to_key(path));
        let cursor = cursor.filter(|c| !c.trim().is_empty());
        debug!("Listing prefix {:?} cursor present: {}", prefix, cursor.is_some());
        let page = self
            .gateway
            .list_page(&prefix, Some("/"), cursor, self.page_size)
            .await?;

        let mut entries = Vec::new();
        for record in &page.objects {
            // The directory's own placeholder marker lists under its prefix
            if record.key == prefix {
                continue;
            }
            let name = match record.key.strip_prefix(prefix.as_str()) {
                Some(name) => name,
                None => continue,
            };
            // The delimiter should prevent nested names, but backends vary
            if name.is_empty() || name.contains('/') {
                continue;
            }
            entries.push(Entry::file(
                &paths::child_path(path, name),
                record.size,
                record.modified_at,
            ));
        }
        for common in &page.common_prefixes {
            let name = common
                .strip_prefix(prefix.as_str())
                .unwrap_or(common)
                .trim_end_matches('/');
            if name.is_empty() || name.contains('/') {
                continue;
            }
            entries.push(Entry::directory(&paths::child_path(path, name)));
        }

        Ok(Page {
            entries,
            next_cursor: page.next_cursor.filter(|t| !t.trim().is_empty()),
        })
    }
}
