//! Object Store Gateway Abstraction
//!
//! This module defines the capability interface the index core uses to talk
//! to the object store: prefix-delimited listing with continuation cursors,
//! metadata probes, content reads, and presigned download URLs. Higher-level
//! services depend only on this trait, so the real S3 client and the
//! in-memory test store are interchangeable.

pub mod mock_store;
pub mod s3_store;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// One object row returned by a listing call.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    /// Full storage key, including the listing prefix.
    pub key: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// Metadata reported by a `head` probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMeta {
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// One page of a prefix-delimited listing: object rows, one level of
/// common prefixes, and the backend's continuation cursor when more
/// rows remain.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    pub objects: Vec<StoredObject>,
    pub common_prefixes: Vec<String>,
    pub next_cursor: Option<String>,
}

/// Trait defining the object store interface.
///
/// Implementations must be safe for concurrent use from multiple
/// request handlers; the process holds a single shared instance.
/// Absence of an object is reported as `Ok(None)` by `head` and
/// `get_content`; transport faults always surface as
/// `IndexError::BackendUnavailable`.
#[async_trait]
pub trait ObjectStoreGateway: Send + Sync {
    /// Fetch one page of keys under `prefix`, grouped one level deep by
    /// `delimiter` when present. `cursor` is the opaque continuation
    /// token from a previous page; `max_keys` bounds the combined count
    /// of object rows and common prefixes on the page.
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        cursor: Option<&str>,
        max_keys: usize,
    ) -> Result<ObjectPage>;

    /// Probe metadata for a single key.
    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>>;

    /// Read the full content of a single key.
    async fn get_content(&self, key: &str) -> Result<Option<Bytes>>;

    /// Produce a time-limited URL granting direct read access to `key`.
    /// Existence is not checked here; callers probe `head` first when a
    /// missing object must be reported.
    async fn presign_get(&self, key: &str, ttl_secs: u32) -> Result<String>;
}
