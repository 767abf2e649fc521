//! Listing endpoint
//!
//! `GET /api/index?path=/docs&next=<cursor>&sort=name` resolves the
//! path to either a single file's metadata or one page of its directory
//! listing. With `raw=true` the response is instead a redirect to a
//! presigned download URL for the file at that path.

use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use log_mdc;
use serde::Deserialize;
use serde_json::json;

use crate::api::{clean_request_path, gate_and_cache_policy, presented_token};
use crate::app_state::AppState;
use crate::error::IndexError;
use crate::service::entry::sort_entries_by_name;

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    #[serde(default = "default_path")]
    path: String,
    #[serde(default)]
    raw: bool,
    #[serde(default)]
    next: String,
    #[serde(default)]
    sort: String,
}

pub async fn handler(
    query: web::Query<IndexQuery>,
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, IndexError> {
    let clean_path = clean_request_path(&query.path)?;
    log_mdc::insert("path", &clean_path);
    debug!("Index request for {:?} raw: {}", clean_path, query.raw);

    let token = presented_token(&req, None);
    let cache = gate_and_cache_policy(&state, &clean_path, token.as_deref()).await?;

    // Raw mode bypasses the listing and hands out a download redirect
    if query.raw {
        let url = state.downloads.download_url(&clean_path).await?;
        return Ok(HttpResponse::Found()
            .insert_header(("Location", url))
            .insert_header(("Cache-Control", "no-cache"))
            .insert_header(("Access-Control-Allow-Origin", "*"))
            .insert_header(("Access-Control-Allow-Methods", "GET, HEAD"))
            .finish());
    }

    // A path naming a file answers with its metadata, not a listing
    if let Some(entry) = state.lister.resolve(&clean_path).await? {
        return Ok(HttpResponse::Ok()
            .insert_header(("Cache-Control", cache))
            .json(json!({ "file": entry })));
    }

    let next = if query.next.trim().is_empty() {
        None
    } else {
        Some(query.next.as_str())
    };
    let mut page = state.lister.list_page(&clean_path, next).await?;
    if query.sort == "name" {
        sort_entries_by_name(&mut page.entries);
    }

    let mut body = json!({ "folder": { "value": page.entries } });
    if let Some(cursor) = page.next_cursor {
        body["next"] = json!(cursor);
    }
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", cache))
        .json(body))
}
