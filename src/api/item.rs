//! Item metadata endpoint
//!
//! `GET /api/item?id=/docs/report.pdf` answers with the entry's
//! identity and its parent directory. Item ids are logical paths.

use actix_web::{web, HttpResponse};
use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::api::public_cache_value;
use crate::app_state::AppState;
use crate::error::IndexError;
use crate::paths;

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    #[serde(default)]
    id: String,
}

pub async fn handler(
    query: web::Query<ItemQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, IndexError> {
    let clean_path = paths::normalize(&query.id);
    debug!("Item request for {:?}", clean_path);

    let entry = state
        .lister
        .resolve(&clean_path)
        .await?
        .ok_or_else(|| IndexError::NotFound(clean_path.clone()))?;

    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", public_cache_value(&state)))
        .json(json!({
            "id": entry.path,
            "name": entry.name,
            "parentReference": { "path": paths::parent(&clean_path) },
        })))
}
