use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use motorpool::config::AppConfig;
use motorpool::db;
use motorpool::handlers;
use motorpool::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/reservations", get(handlers::reservations::list_reservations))
        .route("/reservations", post(handlers::reservations::create_reservation))
        .route("/reservations/:id", get(handlers::reservations::get_reservation))
        .route("/reservations/:id", put(handlers::reservations::update_reservation))
        .route(
            "/reservations/:id",
            delete(handlers::reservations::delete_reservation),
        )
        .route(
            "/reservations/vehicle/:vehicle_id",
            get(handlers::reservations::list_by_vehicle),
        )
        .route(
            "/reservations/vehicle/:vehicle_id/active",
            get(handlers::reservations::vehicle_active),
        )
        .route(
            "/reservations/vehicle/:vehicle_id/upcoming",
            get(handlers::reservations::vehicle_upcoming),
        )
        .route(
            "/reservations/vehicle/:vehicle_id/check",
            get(handlers::reservations::vehicle_check),
        )
        .route("/vehicles", get(handlers::vehicles::list_vehicles))
        .route("/vehicles", post(handlers::vehicles::create_vehicle))
        .route("/vehicles/:id", get(handlers::vehicles::get_vehicle))
        .route("/audit", get(handlers::audit::list_audit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
