/// Video Message Service - HTTP Server
///
/// Accepts video-message requests, simulates processing, and serves
/// request status plus uploaded soundtracks.
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use video_message_service::handlers;
use video_message_service::services::VideoProcessor;
use video_message_service::storage::{JsonFileStore, RequestStore};
use video_message_service::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting video-message-service v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!(
        "Requests file: {}, processing mode: {:?}",
        config.storage.requests_file.display(),
        config.processing.mode
    );

    let store: Arc<dyn RequestStore> =
        Arc::new(JsonFileStore::new(config.storage.requests_file.clone()));
    let processor = Arc::new(VideoProcessor::new(
        store.clone(),
        config.processing.mode,
        Duration::from_millis(config.processing.stage_delay_ms),
    ));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let server = HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(processor.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/api/health",
                web::get().to(|| async {
                    HttpResponse::Ok().json(serde_json::json!({
                        "status": "ok",
                        "service": "video-message-service",
                        "version": env!("CARGO_PKG_VERSION")
                    }))
                }),
            )
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/requests")
                            .route("", web::post().to(handlers::create_request))
                            .route("/{id}", web::get().to(handlers::get_request))
                            .route("/{id}/status", web::get().to(handlers::get_status))
                            .route("/{id}/video", web::get().to(handlers::get_video_page)),
                    )
                    .route("/upload-music", web::post().to(handlers::upload_music)),
            )
            .route("/uploads/{filename}", web::get().to(handlers::serve_upload))
    })
    .bind(&bind_address)?
    .run();

    server.await?;

    tracing::info!("video-message-service shutting down");
    Ok(())
}
