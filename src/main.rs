//! Renta marketplace backend server
//!
//! HTTP backend for the rental marketplace: identity verification,
//! reservation creation with server-side pricing, and booking reads.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use renta_api::handlers::{configure_bookings, configure_identity};
use renta_auth::JwtService;
use renta_core::config::AppConfig;
use renta_core::traits::{BookingRepository, IdentityRepository};
use renta_db::{create_pool, PgBookingRepository, PgIdentityRepository};
use renta_services::{IdentityVerificationManager, ReservationService};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "renta-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Identity verification endpoints
            .configure(configure_identity)
            // Booking endpoints
            .configure(configure_bookings),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "renta_backend={},renta_api={},renta_services={},renta_db={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!(
        "Starting Renta backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = AppConfig::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let jwt_service = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_secs,
    ));

    info!(
        "JWT service configured with {} second token expiration",
        config.auth.jwt_expiration_secs
    );

    info!("Connecting to database...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e))?;

    // Wire repositories into the services shared across workers
    let identity_repo: Arc<dyn IdentityRepository> =
        Arc::new(PgIdentityRepository::new(pool.clone()));
    let booking_repo: Arc<dyn BookingRepository> =
        Arc::new(PgBookingRepository::new(pool.clone()));

    let identity_service = web::Data::new(IdentityVerificationManager::new(identity_repo.clone()));
    let booking_service = web::Data::new(ReservationService::new(
        identity_repo,
        booking_repo,
        config.booking.clone(),
    ));

    info!(
        lock_window_minutes = config.booking.lock_window_minutes,
        require_verified_identity = config.booking.require_verified_identity,
        "Booking policy loaded"
    );

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    let cors_origins = config.server.cors_origins.clone();

    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    HttpServer::new(move || {
        // Configure CORS - clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::COOKIE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(identity_service.clone())
            .app_data(booking_service.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_body",
                        "message": error_message
                    })),
                )
                .into()
            }))
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
