//! Download Resolution
//!
//! Resolves a file path into either a presigned redirect URL or, for
//! files under the configured proxy threshold, the inline content
//! itself. Directories and missing objects are reported as not found.

use bytes::Bytes;
use log::debug;
use std::sync::Arc;

use crate::error::{IndexError, Result};
use crate::gateway::ObjectStoreGateway;
use crate::paths;
use crate::service::entry::Entry;
use crate::service::lister::probe_file;

/// How a download request should be answered.
pub enum DownloadOutcome {
    /// Serve the body directly; the file fit the proxy threshold
    Inline { entry: Entry, body: Bytes },
    /// Redirect the client to a presigned URL
    Redirect { url: String },
}

/// Produces download URLs and inline passthrough bodies.
pub struct DownloadService {
    gateway: Arc<dyn ObjectStoreGateway>,
    presign_ttl_secs: u32,
    proxy_max_bytes: u64,
}

impl DownloadService {
    pub fn new(
        gateway: Arc<dyn ObjectStoreGateway>,
        presign_ttl_secs: u32,
        proxy_max_bytes: u64,
    ) -> Self {
        Self {
            gateway,
            presign_ttl_secs,
            proxy_max_bytes,
        }
    }

    /// Presigned download URL for the file at `path`. Fails with
    /// `NotFound` when no file object exists there.
    pub async fn download_url(&self, path: &str) -> Result<String> {
        let entry = match probe_file(self.gateway.as_ref(), path).await? {
            Some(entry) => entry,
            None => return Err(IndexError::NotFound(path.to_string())),
        };
        debug!("Presigning download for {:?}", entry.path);
        self.gateway
            .presign_get(paths::to_key(&entry.path), self.presign_ttl_secs)
            .await
    }

    /// Full download flow: resolve the file, then either proxy small
    /// content inline (when the caller asked for it) or hand back a
    /// presigned redirect.
    pub async fn fetch(&self, path: &str, allow_proxy: bool) -> Result<DownloadOutcome> {
        let entry = match probe_file(self.gateway.as_ref(), path).await? {
            Some(entry) => entry,
            None => return Err(IndexError::NotFound(path.to_string())),
        };
        let key = paths::to_key(&entry.path);

        if allow_proxy && entry.size < self.proxy_max_bytes {
            match self.gateway.get_content(key).await? {
                Some(body) => {
                    debug!("Proxying {} bytes for {:?}", body.len(), entry.path);
                    return Ok(DownloadOutcome::Inline { entry, body });
                }
                // Object vanished between the probe and the read
                None => return Err(IndexError::NotFound(path.to_string())),
            }
        }

        let url = self.gateway.presign_get(key, self.presign_ttl_secs).await?;
        Ok(DownloadOutcome::Redirect { url })
    }
}
