pub mod assignment_routes;
pub mod car_routes;
pub mod client_routes;
pub mod parking_space_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::StorageBackend;
use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Construir la aplicación completa con todas las rutas y capas
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/parking-assignments", assignment_routes::create_assignment_router())
        .nest("/api/parking-spaces", parking_space_routes::create_parking_space_router())
        .nest("/api/clients", client_routes::create_client_router())
        .nest("/api/cars", car_routes::create_car_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let storage = match state.config.storage_backend {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    };
    Json(json!({
        "status": "ok",
        "storage": storage,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
