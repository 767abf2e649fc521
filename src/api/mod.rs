//! HTTP API
//!
//! Thin request handlers over the core services: directory listing,
//! item metadata, raw downloads, and search. Handlers normalize the
//! requested path, run the protected-route gate, pick the response
//! cache policy, and delegate everything else to the services held in
//! application state.

pub mod index;
pub mod item;
pub mod raw;
pub mod search;

use actix_web::HttpRequest;

use crate::app_state::AppState;
use crate::error::{IndexError, Result};
use crate::paths;
use crate::service::RouteOutcome;

/// Header carrying the client token for protected routes.
pub const PROTECTED_TOKEN_HEADER: &str = "x-protected-token";

/// Placeholder the web client sends when its catch-all path segment
/// captured nothing.
const UNRESOLVED_PATH_PLACEHOLDER: &str = "[...path]";

/// Cache-Control value for responses on unprotected routes.
pub(crate) fn public_cache_value(state: &AppState) -> String {
    format!("public, max-age={}", state.config.listing.cache_ttl_secs)
}

/// Validates and normalizes the `path` query value.
pub(crate) fn clean_request_path(raw: &str) -> Result<String> {
    if raw == UNRESOLVED_PATH_PLACEHOLDER {
        return Err(IndexError::InvalidPath(raw.to_string()));
    }
    Ok(paths::normalize(raw))
}

/// Client token from the protected-route header, with an optional
/// query-string fallback for links that cannot carry headers.
pub(crate) fn presented_token(req: &HttpRequest, query_fallback: Option<&str>) -> Option<String> {
    req.headers()
        .get(PROTECTED_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .or_else(|| query_fallback.map(|value| value.to_string()))
}

/// Runs the route gate and maps the outcome to a cache policy for this
/// response. Unauthenticated and unconfigured-secret paths short-circuit
/// into their error responses here.
pub(crate) async fn gate_and_cache_policy(
    state: &AppState,
    path: &str,
    token: Option<&str>,
) -> Result<String> {
    match state.auth_gate.check_route(path, token).await? {
        RouteOutcome::Open => Ok(public_cache_value(state)),
        // Protected listings must never be served from shared caches
        RouteOutcome::Authenticated => Ok("no-cache".to_string()),
        RouteOutcome::Unauthenticated => Err(IndexError::Unauthenticated),
        RouteOutcome::NoSecretConfigured => Err(IndexError::NoSecretConfigured),
    }
}
