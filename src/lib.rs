#[cfg(feature = "server")]
use std::sync::Mutex;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_multipart::form::MultipartFormConfig;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::services::session::PipelineSession;

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;

/// Registers the JSON API on `cfg`. Shared with the integration tests.
#[cfg(feature = "server")]
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    use crate::routes::bulk::{bulk_stage, bulk_tag, bulk_trash};
    use crate::routes::client::{change_client_stage, delete_client, restore_client, trash_client};
    use crate::routes::import::{import_clients, preview_import};
    use crate::routes::pipeline::{export_csv, list_clients, show_board};
    use crate::routes::tag::{create_tag, list_tags};

    cfg.service(
        web::scope("/api/v1")
            .service(show_board)
            .service(list_clients)
            .service(export_csv)
            .service(list_tags)
            .service(create_tag)
            .service(change_client_stage)
            .service(trash_client)
            .service(restore_client)
            .service(delete_client)
            .service(bulk_stage)
            .service(bulk_tag)
            .service(bulk_trash)
            .service(preview_import)
            .service(import_clients),
    );
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let session = web::Data::new(Mutex::new(PipelineSession::new()));
    let upload_limit = server_config.upload_limit_mb * 1024 * 1024;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting pipeline server on {}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(configure_api)
            .app_data(MultipartFormConfig::default().total_limit(upload_limit))
            .app_data(web::Data::new(repo.clone()))
            .app_data(session.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
