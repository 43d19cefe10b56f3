//! Rutas de la API HTTP

pub mod auth_routes;
pub mod device_routes;
pub mod fleet_routes;
pub mod settings_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Límite de requests concurrentes del servicio
const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Router con trazas, compresión, CORS y límite de concurrencia
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);
    create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors)
            .concurrency_limit(MAX_CONCURRENT_REQUESTS),
    )
}

/// Router completo de la API, sin capas
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/api/users", user_routes::create_user_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/devices", device_routes::create_device_router())
        .nest("/api/settings", settings_routes::create_settings_router())
        .nest("/api", fleet_routes::create_fleet_router())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet_manager",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
