//! Error Taxonomy
//!
//! Every failure in the indexing pipeline collapses into one of a small set
//! of outcome kinds, each with a stable HTTP mapping and a short message.
//! Backend faults keep their original cause attached for server-side logging
//! but are never serialized into a response body.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

/// Source type for backend faults. Gateway implementations box whatever
/// transport error they hit into this so callers stay backend-agnostic.
pub type BackendCause = Box<dyn std::error::Error + Send + Sync>;

/// All errors produced by the index core and surfaced through the API.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Caller-supplied path failed validation before any backend work.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// No object or prefix exists at the resolved location.
    #[error("not found: {0}")]
    NotFound(String),

    /// Route is declared protected but its secret marker object is missing.
    /// Operator misconfiguration, reported as a 404-class condition rather
    /// than an access grant.
    #[error("no access secret configured for this route")]
    NoSecretConfigured,

    /// Access token missing or did not match the configured secret.
    #[error("missing or invalid access token")]
    Unauthenticated,

    /// The object store call failed for transport/permission/throttling
    /// reasons. The cause is logged in full and hidden from the client.
    #[error("storage backend unavailable")]
    BackendUnavailable(#[source] BackendCause),
}

impl IndexError {
    /// Wraps an arbitrary backend failure, boxing the cause for logging.
    pub fn backend<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        IndexError::BackendUnavailable(Box::new(cause))
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl ResponseError for IndexError {
    fn status_code(&self) -> StatusCode {
        match self {
            IndexError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            IndexError::NotFound(_) => StatusCode::NOT_FOUND,
            IndexError::NoSecretConfigured => StatusCode::NOT_FOUND,
            IndexError::Unauthenticated => StatusCode::UNAUTHORIZED,
            IndexError::BackendUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let IndexError::BackendUnavailable(cause) = self {
            error!("storage backend failure: {}", cause);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
