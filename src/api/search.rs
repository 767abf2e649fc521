//! Search endpoint
//!
//! `GET /api/search?q=report&path=/docs` walks the hierarchy under the
//! given root and returns entries whose names contain the query. The
//! root is auth-gated like any other route; an empty query short-circuits
//! to an empty result without touching storage.

use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use log_mdc;
use serde::Deserialize;

use crate::api::{clean_request_path, gate_and_cache_policy, presented_token};
use crate::app_state::AppState;
use crate::error::IndexError;
use crate::service::Entry;

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    #[serde(default = "default_path")]
    path: String,
    #[serde(default)]
    limit: Option<usize>,
}

pub async fn handler(
    query: web::Query<SearchQuery>,
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, IndexError> {
    let clean_path = clean_request_path(&query.path)?;
    log_mdc::insert("path", &clean_path);
    debug!("Search request under {:?} for {:?}", clean_path, query.q);

    let token = presented_token(&req, None);
    let cache = gate_and_cache_policy(&state, &clean_path, token.as_deref()).await?;

    if query.q.trim().is_empty() {
        let empty: Vec<Entry> = Vec::new();
        return Ok(HttpResponse::Ok()
            .insert_header(("Cache-Control", cache))
            .json(empty));
    }

    let max = state.config.search.max_results;
    let limit = query.limit.unwrap_or(max).min(max);
    let entries = state.search.search(&clean_path, &query.q, limit).await?;

    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", cache))
        .json(entries))
}
