//! S3-backed implementation of ObjectStoreGateway
//!
//! Wraps a rust-s3 `Bucket` configured for AWS or any S3-compatible
//! endpoint. Keys crossing this boundary are bucket-root-relative: the
//! configured root prefix is joined on the way into the bucket and
//! stripped from every returned key and common prefix, so higher layers
//! never see it.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::debug;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;

use crate::config::StorageConfig;
use crate::error::{IndexError, Result};
use crate::gateway::{ObjectMeta, ObjectPage, ObjectStoreGateway, StoredObject};

/// S3 implementation of the gateway, safe for concurrent use.
pub struct S3ObjectStore {
    bucket: Bucket,
    // "" or "dir/" form, joined in front of every key
    root_prefix: String,
}

impl S3ObjectStore {
    /// Build a store from storage configuration. Fails if the
    /// credentials or bucket handle cannot be constructed.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };
        let credentials = Credentials::new(
            Some(config.access_key.as_str()),
            Some(config.secret_key.as_str()),
            None,
            None,
            None,
        )
        .map_err(IndexError::backend)?;
        let bucket = Bucket::new(&config.bucket, region, credentials).map_err(IndexError::backend)?;
        // Non-AWS endpoints (MinIO and friends) usually need path-style URLs
        let bucket = if config.path_style {
            bucket.with_path_style()
        } else {
            bucket
        };
        Ok(Self {
            bucket,
            root_prefix: normalize_root(&config.root_prefix),
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.root_prefix, key)
    }

    fn strip_root<'a>(&self, full: &'a str) -> &'a str {
        full.strip_prefix(self.root_prefix.as_str()).unwrap_or(full)
    }
}

/// Collapses a configured root directory into its canonical joined form:
/// empty for the bucket root, otherwise `dir/` with no leading slash.
fn normalize_root(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

/// Listing bodies carry ISO 8601 timestamps while head responses carry
/// HTTP dates; accept both and fall back to the current time, since
/// entry timestamps are informational only.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Missing objects surface either as an error (fail-on-err builds) or as
/// a plain 404 status; both map to `None` for the caller.
fn is_not_found(err: &S3Error) -> bool {
    matches!(err, S3Error::HttpFailWithBody(404, _))
}

fn unexpected_status(op: &str, code: u16) -> IndexError {
    IndexError::backend(std::io::Error::other(format!(
        "S3 {} returned HTTP status {}",
        op, code
    )))
}

#[async_trait]
impl ObjectStoreGateway for S3ObjectStore {
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        cursor: Option<&str>,
        max_keys: usize,
    ) -> Result<ObjectPage> {
        let full_prefix = self.full_key(prefix);
        debug!(
            "S3: listing prefix {:?} cursor present: {}",
            full_prefix,
            cursor.is_some()
        );
        let (result, code) = self
            .bucket
            .list_page(
                full_prefix,
                delimiter.map(|d| d.to_string()),
                cursor.map(|c| c.to_string()),
                None,
                Some(max_keys),
            )
            .await
            .map_err(IndexError::backend)?;
        if !(200..300).contains(&code) {
            return Err(unexpected_status("list", code));
        }

        let mut page = ObjectPage::default();
        for object in result.contents {
            page.objects.push(StoredObject {
                key: self.strip_root(&object.key).to_string(),
                size: object.size,
                modified_at: parse_timestamp(&object.last_modified),
            });
        }
        if let Some(prefixes) = result.common_prefixes {
            for common in prefixes {
                page.common_prefixes
                    .push(self.strip_root(&common.prefix).to_string());
            }
        }
        page.next_cursor = result.next_continuation_token.filter(|t| !t.is_empty());
        Ok(page)
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>> {
        let full = self.full_key(key);
        match self.bucket.head_object(&full).await {
            Ok((head, code)) if (200..300).contains(&code) => Ok(Some(ObjectMeta {
                size: head.content_length.unwrap_or(0).max(0) as u64,
                modified_at: head
                    .last_modified
                    .as_deref()
                    .map(parse_timestamp)
                    .unwrap_or_else(Utc::now),
            })),
            Ok((_, 404)) => Ok(None),
            Ok((_, code)) => Err(unexpected_status("head", code)),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(IndexError::backend(err)),
        }
    }

    async fn get_content(&self, key: &str) -> Result<Option<Bytes>> {
        let full = self.full_key(key);
        match self.bucket.get_object(&full).await {
            Ok(response) => match response.status_code() {
                code if (200..300).contains(&code) => Ok(Some(response.bytes().clone())),
                404 => Ok(None),
                code => Err(unexpected_status("get", code)),
            },
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(IndexError::backend(err)),
        }
    }

    async fn presign_get(&self, key: &str, ttl_secs: u32) -> Result<String> {
        let full = self.full_key(key);
        debug!("S3: presigning {:?} for {}s", full, ttl_secs);
        self.bucket
            .presign_get(&full, ttl_secs, None)
            .await
            .map_err(IndexError::backend)
    }
}
