// HTTP API integration tests over a seeded in-memory store
use actix_web::{test, web, App, http::StatusCode};
use std::sync::Arc;

use bucket_index::api;
use bucket_index::app_state::AppState;
use bucket_index::config::{AppConfig, StorageBackend};
use bucket_index::gateway::mock_store::MockObjectStore;

/// A small bucket with one root file, two open directories and one
/// password-protected directory.
fn seeded_store() -> Arc<MockObjectStore> {
    let store = Arc::new(MockObjectStore::new());
    store.insert_object("readme.md", b"hello index");
    store.insert_object("docs/guide.pdf", &[7u8; 64]);
    store.insert_object("docs/notes.txt", b"meeting notes");
    store.insert_object("media/clips/intro.mp4", &[0u8; 2048]);
    store.insert_object("private/.password", b"hunter2");
    store.insert_object("private/salary.xlsx", b"cells");
    store
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Mock;
    config.auth.protected_routes = vec!["/private".to_string()];
    config
}

fn seeded_state() -> AppState {
    AppState::with_gateway(test_config(), seeded_store())
}

/// Test listing the bucket root: one file row, then the subdirectories
#[actix_web::test]
async fn test_index_lists_root_directory() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/index").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Cache-Control").unwrap(),
        "public, max-age=30"
    );

    let body: serde_json::Value = test::read_body_json(resp).await;
    let value = body["folder"]["value"].as_array().unwrap();
    let names: Vec<&str> = value.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["readme.md", "docs", "media", "private"]);
    assert_eq!(value[0]["kind"], "file");
    assert_eq!(value[0]["size"], 11);
    assert_eq!(value[1]["kind"], "directory");
    assert_eq!(value[1]["path"], "/docs");
    assert!(body.get("next").is_none());
}

/// Test that a path naming a file answers with file metadata
#[actix_web::test]
async fn test_index_answers_file_metadata() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/index?path=/docs/guide.pdf")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["file"]["name"], "guide.pdf");
    assert_eq!(body["file"]["path"], "/docs/guide.pdf");
    assert_eq!(body["file"]["size"], 64);
    assert!(body["file"]["lastModifiedDateTime"].is_string());
}

/// Test the web client's unresolved catch-all placeholder
#[actix_web::test]
async fn test_index_rejects_placeholder_path() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    // percent-encoded "[...path]"
    let req = test::TestRequest::get()
        .uri("/api/index?path=%5B...path%5D")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("invalid path"));
}

/// Test the optional stable name sort
#[actix_web::test]
async fn test_index_sorts_by_name_on_request() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/index?sort=name")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body["folder"]["value"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["docs", "media", "private", "readme.md"]);
}

/// Test following the continuation cursor across listing pages
#[actix_web::test]
async fn test_index_paginates_with_cursor() {
    let mut config = test_config();
    config.listing.page_size = 2;
    let state = AppState::with_gateway(config, seeded_store());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/index").to_request();
    let resp = test::call_service(&app, req).await;
    let first: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(first["folder"]["value"].as_array().unwrap().len(), 2);
    let cursor = first["next"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/index?next={}", cursor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let second: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(second["folder"]["value"].as_array().unwrap().len(), 2);
    assert!(second.get("next").is_none());

    // The two pages cover all four root entries without overlap
    let mut names: Vec<String> = first["folder"]["value"]
        .as_array()
        .unwrap()
        .iter()
        .chain(second["folder"]["value"].as_array().unwrap().iter())
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 4);
}

/// Test raw mode on the index endpoint: a redirect to the download URL
#[actix_web::test]
async fn test_index_raw_redirects_to_download() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/index?path=/readme.md&raw=true")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "mock://bucket/readme.md?expires=3600"
    );
    assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-cache");
}

/// Test the protected directory: 401 without a token, 200 with one,
/// and no shared-cache header on the authenticated response
#[actix_web::test]
async fn test_protected_route_requires_token() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/index?path=/private")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "missing or invalid access token");

    let req = test::TestRequest::get()
        .uri("/api/index?path=/private")
        .insert_header(("x-protected-token", "wrong"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/index?path=/private")
        .insert_header(("x-protected-token", "hunter2"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-cache");

    let body: serde_json::Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body["folder"]["value"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec![".password", "salary.xlsx"]);
}

/// Test a protected prefix whose marker object was never uploaded
#[actix_web::test]
async fn test_protected_route_without_marker_is_404() {
    let mut config = test_config();
    config.auth.protected_routes.push("/vault".to_string());
    let state = AppState::with_gateway(config, seeded_store());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/index?path=/vault/anything")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "no access secret configured for this route");
}

/// Test proxying a small file through the raw endpoint
#[actix_web::test]
async fn test_raw_proxies_small_files_inline() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/raw").route(web::get().to(api::raw::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/raw?path=/docs/notes.txt&proxy=true")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("Content-Type").unwrap(), "text/plain");
    assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-cache");
    assert_eq!(resp.headers().get("Access-Control-Allow-Origin").unwrap(), "*");

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"meeting notes");
}

/// Test that without the proxy flag even small files redirect
#[actix_web::test]
async fn test_raw_redirects_without_proxy_flag() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/raw").route(web::get().to(api::raw::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/raw?path=/docs/notes.txt")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "mock://bucket/docs/notes.txt?expires=3600"
    );
}

/// Test the token query fallback for protected raw links
#[actix_web::test]
async fn test_raw_accepts_query_token() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/raw").route(web::get().to(api::raw::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/raw?path=/private/salary.xlsx")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/raw?path=/private/salary.xlsx&token=hunter2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

/// Test raw on a directory path
#[actix_web::test]
async fn test_raw_rejects_directories() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/raw").route(web::get().to(api::raw::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/raw?path=/docs")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

/// Test item metadata and its parent reference
#[actix_web::test]
async fn test_item_returns_metadata_with_parent() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/item").route(web::get().to(api::item::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/item?id=/docs/guide.pdf")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], "/docs/guide.pdf");
    assert_eq!(body["name"], "guide.pdf");
    assert_eq!(body["parentReference"]["path"], "/docs");

    let req = test::TestRequest::get()
        .uri("/api/item?id=/docs/missing.pdf")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

/// Test searching across nested directories for files and directories
#[actix_web::test]
async fn test_search_finds_nested_matches() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/search").route(web::get().to(api::search::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/search?q=notes")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["path"], "/docs/notes.txt");
    assert_eq!(results[0]["kind"], "file");

    // Directory names match too
    let req = test::TestRequest::get()
        .uri("/api/search?q=clips")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["path"], "/media/clips");
    assert_eq!(results[0]["kind"], "directory");
}

/// Test that search under a protected root is gated like a listing
#[actix_web::test]
async fn test_search_requires_token_under_protected_root() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/search").route(web::get().to(api::search::handler))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/search?q=salary&path=/private")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/search?q=salary&path=/private")
        .insert_header(("x-protected-token", "hunter2"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

/// Test the empty-query short circuit
#[actix_web::test]
async fn test_search_empty_query_returns_empty() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/search").route(web::get().to(api::search::handler))),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/search").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

/// Test that requested limits cannot exceed the configured cap
#[actix_web::test]
async fn test_search_clamps_limit() {
    let mut config = test_config();
    config.search.max_results = 2;
    let state = AppState::with_gateway(config, seeded_store());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/api/search").route(web::get().to(api::search::handler))),
    )
    .await;

    // "." appears in every seeded file name
    let req = test::TestRequest::get()
        .uri("/api/search?q=.&limit=999")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

/// Test that the API answers 405 for non-GET methods
#[actix_web::test]
async fn test_non_get_method_not_allowed() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(seeded_state()))
            .service(web::resource("/api/index").route(web::get().to(api::index::handler))),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/index").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
