//! Protected Route Gate
//!
//! Decides whether a logical path falls under a configured protected
//! prefix and, when it does, compares a client-presented token against
//! the secret stored in the prefix's marker object. Matching is
//! case-insensitive and scans prefixes in declaration order, stopping at
//! the first hit; nested prefixes therefore resolve to whichever one is
//! declared first, not the most specific.

use log::debug;
use std::sync::Arc;

use crate::error::Result;
use crate::gateway::ObjectStoreGateway;
use crate::paths;

/// Admissibility of one request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Path carries no protection; responses may be cached
    Open,
    /// Path is protected and the presented token matched
    Authenticated,
    /// Path is protected and the token was missing or wrong
    Unauthenticated,
    /// Path is protected but its marker object does not exist
    NoSecretConfigured,
}

/// A presented token is accepted either as the stored secret itself or
/// as the hex md5 digest of the stored secret, so shared links can
/// carry a token that does not reveal the password outright.
fn token_matches(presented: Option<&str>, stored: &str) -> bool {
    let stored = stored.trim();
    if stored.is_empty() {
        return false;
    }
    match presented {
        Some(token) if !token.is_empty() => {
            token == stored || token == hex::encode(md5::compute(stored).0)
        }
        _ => false,
    }
}

/// Gate over the configured protected prefixes.
pub struct AuthGate {
    gateway: Arc<dyn ObjectStoreGateway>,
    protected_routes: Vec<String>,
    marker_filename: String,
}

impl AuthGate {
    pub fn new(
        gateway: Arc<dyn ObjectStoreGateway>,
        protected_routes: Vec<String>,
        marker_filename: String,
    ) -> Self {
        Self {
            gateway,
            protected_routes,
            marker_filename,
        }
    }

    /// Storage key of the marker object guarding `path`, or `None` when
    /// no configured prefix covers it. Comparison folds case on both
    /// sides and the derived key keeps the folded form.
    fn marker_key_for(&self, path: &str) -> Option<String> {
        let probe = format!("{}/", path.to_lowercase());
        for route in &self.protected_routes {
            let mut folded = route.to_lowercase();
            if folded.ends_with('/') {
                folded.pop();
            }
            folded.push('/');
            if probe.starts_with(&folded) {
                let marker_path = format!("{}{}", folded, self.marker_filename);
                return Some(paths::to_key(&marker_path).to_string());
            }
        }
        None
    }

    /// Check whether `path` may be served given the presented token.
    /// Backend faults while reading the marker propagate as errors and
    /// never degrade into an open route.
    pub async fn check_route(
        &self,
        path: &str,
        presented_token: Option<&str>,
    ) -> Result<RouteOutcome> {
        let marker_key = match self.marker_key_for(path) {
            Some(key) => key,
            None => return Ok(RouteOutcome::Open),
        };
        debug!("Protected path {:?}, marker key {:?}", path, marker_key);

        if self.gateway.head(&marker_key).await?.is_none() {
            return Ok(RouteOutcome::NoSecretConfigured);
        }
        let secret = match self.gateway.get_content(&marker_key).await? {
            Some(bytes) => bytes,
            // Marker vanished between the probe and the read
            None => return Ok(RouteOutcome::NoSecretConfigured),
        };
        let secret = String::from_utf8_lossy(&secret);

        if token_matches(presented_token, &secret) {
            Ok(RouteOutcome::Authenticated)
        } else {
            Ok(RouteOutcome::Unauthenticated)
        }
    }
}
