// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config and storage, start the HTTP and gRPC servers

mod auth;
mod config;
mod db;
mod errors;
mod grpc;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::{Config, StorageBackend};
use db::{
    CommentsRepository, MemoryCommentsRepository, MemoryPhotosRepository, PhotosRepository,
    PostgresCommentsRepository, PostgresPhotosRepository,
};
use dotenv::dotenv;
use grpc::CommenterGrpcService;
use services::{start_cleanup_task, CommentsService, GeocodeCache, GeocodingClient, PhotosService};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting photoshare service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "HTTP address: {}:{} / gRPC address: {}:{}",
        config.server_address,
        config.server_port,
        config.server_address,
        config.grpc_port
    );

    // 4. Initialize storage
    let (photos_repository, comments_repository): (
        Arc<dyn PhotosRepository>,
        Arc<dyn CommentsRepository>,
    ) = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = match config::init_db_pool(&config).await {
                Ok(pool) => pool,
                Err(e) => {
                    log::error!("Failed to connect to database: {}", e);
                    std::process::exit(1);
                }
            };
            (
                Arc::new(PostgresPhotosRepository::new(pool.clone())),
                Arc::new(PostgresCommentsRepository::new(pool)),
            )
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage - data is lost on shutdown");
            (
                Arc::new(MemoryPhotosRepository::new()),
                Arc::new(MemoryCommentsRepository::new()),
            )
        }
    };

    let photos_service = web::Data::new(PhotosService::new(photos_repository));
    let comments_service = Arc::new(CommentsService::new(comments_repository));

    // 5. Initialize the geocoding client and its cache
    let cache = Arc::new(GeocodeCache::new(config.geocoder_cache_ttl));
    log::info!(
        "Initialized geocoding cache (TTL: {}s)",
        config.geocoder_cache_ttl
    );

    // Start background cleanup task (runs every 5 minutes)
    start_cleanup_task(cache.clone(), 300);

    let geocoder = web::Data::new(GeocodingClient::new(
        config.geocoder_base_url.clone(),
        cache,
    ));

    // 6. Start the Commenter gRPC service
    let grpc_addr: SocketAddr =
        match format!("{}:{}", config.server_address, config.grpc_port).parse() {
            Ok(addr) => addr,
            Err(e) => {
                log::error!("Invalid gRPC listen address: {}", e);
                std::process::exit(1);
            }
        };

    let commenter = CommenterGrpcService::new(comments_service.clone(), config.clone());
    tokio::spawn(async move {
        log::info!("Starting Commenter gRPC service on {}", grpc_addr);
        if let Err(e) = tonic::transport::Server::builder()
            .add_service(commenter.into_server())
            .serve(grpc_addr)
            .await
        {
            log::error!("gRPC server error: {}", e);
        }
    });

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let max_upload_bytes = config.max_upload_bytes;
    let config_clone = config.clone();
    let comments_data = web::Data::from(comments_service);

    HttpServer::new(move || {
        App::new()
            // Application state (config, services, geocoder)
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(photos_service.clone())
            .app_data(comments_data.clone())
            .app_data(geocoder.clone())
            // Photo uploads carry image bytes in the JSON body
            .app_data(web::JsonConfig::default().limit(max_upload_bytes))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::photos_config)
            .configure(handlers::comments_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
