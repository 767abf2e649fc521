//! Raw download endpoint
//!
//! `GET /api/raw?path=/docs/report.pdf` hands the file out either as a
//! `302 Found` redirect to a presigned URL or, with `proxy=true` and a
//! small enough object, by streaming the bytes through this server.
//! Responses carry permissive CORS headers so raw links can be embedded
//! from other origins, and are never cacheable: redirect targets expire
//! with the presign TTL.

use actix_web::{web, HttpRequest, HttpResponse};
use lazy_static::lazy_static;
use log::debug;
use log_mdc;
use serde::Deserialize;
use std::collections::HashMap;

use crate::api::{clean_request_path, gate_and_cache_policy, presented_token};
use crate::app_state::AppState;
use crate::error::IndexError;
use crate::service::DownloadOutcome;

lazy_static! {
    static ref CONTENT_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("txt", "text/plain");
        m.insert("md", "text/markdown");
        m.insert("html", "text/html");
        m.insert("css", "text/css");
        m.insert("csv", "text/csv");
        m.insert("js", "application/javascript");
        m.insert("json", "application/json");
        m.insert("xml", "application/xml");
        m.insert("yaml", "application/yaml");
        m.insert("yml", "application/yaml");
        m.insert("pdf", "application/pdf");
        m.insert("zip", "application/zip");
        m.insert("gz", "application/gzip");
        m.insert("png", "image/png");
        m.insert("jpg", "image/jpeg");
        m.insert("jpeg", "image/jpeg");
        m.insert("gif", "image/gif");
        m.insert("svg", "image/svg+xml");
        m.insert("webp", "image/webp");
        m.insert("ico", "image/x-icon");
        m.insert("mp3", "audio/mpeg");
        m.insert("flac", "audio/flac");
        m.insert("wav", "audio/wav");
        m.insert("mp4", "video/mp4");
        m.insert("webm", "video/webm");
        m.insert("mkv", "video/x-matroska");
        m
    };
}

/// Content type inferred from the file name's extension, falling back
/// to a generic byte stream.
fn content_type_for(name: &str) -> &'static str {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .and_then(|ext| CONTENT_TYPES.get(ext.as_str()).copied())
        .unwrap_or("application/octet-stream")
}

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Deserialize)]
pub struct RawQuery {
    #[serde(default = "default_path")]
    path: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    proxy: bool,
}

pub async fn handler(
    query: web::Query<RawQuery>,
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, IndexError> {
    let clean_path = clean_request_path(&query.path)?;
    log_mdc::insert("path", &clean_path);
    debug!("Raw request for {:?} proxy: {}", clean_path, query.proxy);

    // Query fallback for clients that cannot attach headers to a link
    let fallback = if query.token.is_empty() {
        None
    } else {
        Some(query.token.as_str())
    };
    let token = presented_token(&req, fallback);
    gate_and_cache_policy(&state, &clean_path, token.as_deref()).await?;

    match state.downloads.fetch(&clean_path, query.proxy).await? {
        DownloadOutcome::Inline { entry, body } => Ok(HttpResponse::Ok()
            .insert_header(("Content-Type", content_type_for(&entry.name)))
            .insert_header(("Cache-Control", "no-cache"))
            .insert_header(("Access-Control-Allow-Origin", "*"))
            .insert_header(("Access-Control-Allow-Methods", "GET, HEAD"))
            .body(body)),
        DownloadOutcome::Redirect { url } => Ok(HttpResponse::Found()
            .insert_header(("Location", url))
            .insert_header(("Cache-Control", "no-cache"))
            .insert_header(("Access-Control-Allow-Origin", "*"))
            .insert_header(("Access-Control-Allow-Methods", "GET, HEAD"))
            .finish()),
    }
}
