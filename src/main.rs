use actix_web::{App, HttpServer, web};
use log::info;
use log4rs;

use bucket_index::api;
use bucket_index::app_state::AppState;
use bucket_index::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load().expect("Failed to load configuration");
    log4rs::init_file(&config.logging.config_file, Default::default()).unwrap();

    let host = config.server.host.clone();
    let port = config.server.port;
    let workers = config.server.workers;
    info!(
        "Starting bucket index server on {}:{} (backend: {:?}, bucket: {})",
        host, port, config.storage.backend, config.storage.bucket
    );

    let state = AppState::from_config(config).map_err(std::io::Error::other)?;

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(web::Data::new(state.clone()))
            // Resources answer 405 on non-GET methods
            .service(web::resource("/api/index").route(web::get().to(api::index::handler)))
            .service(web::resource("/api/raw").route(web::get().to(api::raw::handler)))
            .service(web::resource("/api/item").route(web::get().to(api::item::handler)))
            .service(web::resource("/api/search").route(web::get().to(api::search::handler)))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
