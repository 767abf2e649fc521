//! Mock implementation of ObjectStoreGateway for testing
//!
//! Backed by an in-memory sorted map, with real delimiter grouping and
//! cursor pagination so listing and search logic can be exercised
//! against multi-page trees without a live bucket.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::info;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::error::{IndexError, Result};
use crate::gateway::{ObjectMeta, ObjectPage, ObjectStoreGateway, StoredObject};

#[derive(Debug, Clone)]
struct MockObject {
    data: Bytes,
    modified_at: DateTime<Utc>,
}

/// Unified listing row: objects and common prefixes share one sequence
/// so `max_keys` bounds their combined count, matching backend behavior.
enum ListRow {
    Object(StoredObject),
    Prefix(String),
}

/// Mock implementation of ObjectStoreGateway for testing.
pub struct MockObjectStore {
    // In-memory storage: key -> object, kept sorted for listing
    objects: Arc<Mutex<BTreeMap<String, MockObject>>>,
    // When set, every gateway call fails with BackendUnavailable
    failing: Arc<Mutex<bool>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(BTreeMap::new())),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    /// Insert an object with the current timestamp.
    pub fn insert_object(&self, key: &str, data: &[u8]) {
        self.insert_object_dated(key, data, Utc::now());
    }

    /// Insert an object with an explicit modification time.
    pub fn insert_object_dated(&self, key: &str, data: &[u8], modified_at: DateTime<Utc>) {
        let mut objects = self.objects.lock().unwrap();
        objects.insert(
            key.to_string(),
            MockObject {
                data: Bytes::copy_from_slice(data),
                modified_at,
            },
        );
        info!("Mock: inserted object {} ({} bytes)", key, data.len());
    }

    /// Get the number of objects in the store.
    pub fn object_count(&self) -> usize {
        let objects = self.objects.lock().unwrap();
        objects.len()
    }

    /// Clear all objects from the store.
    pub fn clear(&self) {
        let mut objects = self.objects.lock().unwrap();
        objects.clear();
    }

    /// Make every subsequent gateway call fail with a backend error.
    pub fn set_failing(&self, failing: bool) {
        let mut flag = self.failing.lock().unwrap();
        *flag = failing;
    }

    fn check_failing(&self) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(IndexError::backend(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock backend failure",
            )));
        }
        Ok(())
    }

    /// Build the complete grouped row sequence for a prefix, in key order.
    /// Keys sharing a first-level group under the delimiter collapse into
    /// one prefix row; a key equal to the prefix itself stays an object
    /// row, which is how placeholder markers surface in real listings.
    fn grouped_rows(&self, prefix: &str, delimiter: Option<&str>) -> Vec<ListRow> {
        let objects = self.objects.lock().unwrap();
        let mut rows = Vec::new();
        let mut last_group: Option<String> = None;

        for (key, object) in objects.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            let rest = &key[prefix.len()..];
            let group = delimiter
                .filter(|d| !d.is_empty())
                .and_then(|d| rest.find(d).map(|i| format!("{}{}", prefix, &rest[..i + d.len()])));
            match group {
                Some(group_prefix) => {
                    if last_group.as_deref() != Some(group_prefix.as_str()) {
                        last_group = Some(group_prefix.clone());
                        rows.push(ListRow::Prefix(group_prefix));
                    }
                }
                None => rows.push(ListRow::Object(StoredObject {
                    key: key.clone(),
                    size: object.data.len() as u64,
                    modified_at: object.modified_at,
                })),
            }
        }
        rows
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStoreGateway for MockObjectStore {
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        cursor: Option<&str>,
        max_keys: usize,
    ) -> Result<ObjectPage> {
        self.check_failing()?;

        let rows = self.grouped_rows(prefix, delimiter);
        let start = cursor
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0)
            .min(rows.len());
        // max_keys of zero means unlimited, so a misconfigured page size
        // cannot produce an endless sequence of empty pages
        let page_len = if max_keys == 0 { rows.len() } else { max_keys };
        let end = start.saturating_add(page_len).min(rows.len());

        let mut page = ObjectPage::default();
        for row in &rows[start..end] {
            match row {
                ListRow::Object(record) => page.objects.push(record.clone()),
                ListRow::Prefix(p) => page.common_prefixes.push(p.clone()),
            }
        }
        if end < rows.len() {
            page.next_cursor = Some(end.to_string());
        }
        info!(
            "Mock: listed prefix {:?} rows {}..{} of {}",
            prefix,
            start,
            end,
            rows.len()
        );
        Ok(page)
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>> {
        self.check_failing()?;
        let objects = self.objects.lock().unwrap();
        Ok(objects.get(key).map(|object| ObjectMeta {
            size: object.data.len() as u64,
            modified_at: object.modified_at,
        }))
    }

    async fn get_content(&self, key: &str) -> Result<Option<Bytes>> {
        self.check_failing()?;
        let objects = self.objects.lock().unwrap();
        Ok(objects.get(key).map(|object| object.data.clone()))
    }

    async fn presign_get(&self, key: &str, ttl_secs: u32) -> Result<String> {
        self.check_failing()?;
        Ok(format!("mock://bucket/{}?expires={}", key, ttl_secs))
    }
}
