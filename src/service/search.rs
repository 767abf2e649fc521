//! Search Engine
//!
//! Recursive name search over the presented hierarchy. The walk starts
//! at a root directory, paginates every visited prefix to exhaustion,
//! matches names case-insensitively by substring, and descends into
//! every child directory whether or not its own name matched, since a
//! non-matching directory may still hold matching descendants.
//!
//! Pending prefixes live in an explicit work queue rather than on the
//! call stack, so tree depth cannot overflow it. Sibling prefixes can be
//! visited concurrently up to the configured fanout; results are merged
//! in queue order before the limit is applied, keeping truncation
//! deterministic. Worst case the walk visits every directory under the
//! root and issues one full pagination sequence per directory.

use futures::future::join_all;
use log::debug;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::Result;
use crate::gateway::ObjectStoreGateway;
use crate::paths;
use crate::service::entry::Entry;

/// Matches and children found by fully paginating one prefix.
#[derive(Default)]
struct PrefixVisit {
    matches: Vec<Entry>,
    child_prefixes: Vec<String>,
}

/// Recursive multi-page search traversal over the gateway.
pub struct SearchEngine {
    gateway: Arc<dyn ObjectStoreGateway>,
    page_size: usize,
    fanout: usize,
}

impl SearchEngine {
    pub fn new(gateway: Arc<dyn ObjectStoreGateway>, page_size: usize, fanout: usize) -> Self {
        Self {
            gateway,
            page_size,
            fanout: fanout.max(1),
        }
    }

    /// Walk the hierarchy under `root_path` and return up to `limit`
    /// entries whose name contains `query`, case-insensitively, in
    /// traversal order.
    pub async fn search(&self, root_path: &str, query: &str, limit: usize) -> Result<Vec<Entry>> {
        let needle = query.to_lowercase();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(paths::to_prefix(paths::to_key(root_path)));

        let mut results: Vec<Entry> = Vec::new();
        let mut visited = 0usize;

        while let Some(first) = queue.pop_front() {
            if results.len() >= limit {
                break;
            }
            // Drain one batch of sibling prefixes for this round
            let mut batch = vec![first];
            while batch.len() < self.fanout {
                match queue.pop_front() {
                    Some(prefix) => batch.push(prefix),
                    None => break,
                }
            }
            visited += batch.len();

            let visits = join_all(
                batch
                    .iter()
                    .map(|prefix| self.visit_prefix(prefix, &needle)),
            )
            .await;

            // Merge in queue order so truncation does not depend on
            // which visit finished first
            for visit in visits {
                let visit = visit?;
                for entry in visit.matches {
                    results.push(entry);
                }
                for child in visit.child_prefixes {
                    queue.push_back(child);
                }
            }
        }

        results.truncate(limit);
        debug!(
            "Search for {:?} visited {} prefixes, returning {} entries",
            query,
            visited,
            results.len()
        );
        Ok(results)
    }

    /// Paginate one prefix to exhaustion, collecting matching entries
    /// and every child prefix for later visitation.
    async fn visit_prefix(&self, prefix: &str, needle: &str) -> Result<PrefixVisit> {
        let mut visit = PrefixVisit::default();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .gateway
                .list_page(prefix, Some("/"), cursor.as_deref(), self.page_size)
                .await?;

            for record in &page.objects {
                if record.key == prefix {
                    continue;
                }
                let name = match record.key.strip_prefix(prefix) {
                    Some(name) => name,
                    None => continue,
                };
                if name.is_empty() || name.contains('/') {
                    continue;
                }
                if name.to_lowercase().contains(needle) {
                    visit.matches.push(Entry::file(
                        &paths::key_to_path(&record.key),
                        record.size,
                        record.modified_at,
                    ));
                }
            }

            for common in &page.common_prefixes {
                let name = common
                    .strip_prefix(prefix)
                    .unwrap_or(common)
                    .trim_end_matches('/');
                if name.is_empty() || name.contains('/') {
                    continue;
                }
                if name.to_lowercase().contains(needle) {
                    visit.matches
                        .push(Entry::directory(&paths::key_to_path(common.trim_end_matches('/'))));
                }
                // Descend regardless of whether the name matched
                visit.child_prefixes.push(common.clone());
            }

            match page.next_cursor {
                Some(next) if !next.trim().is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(visit)
    }
}
