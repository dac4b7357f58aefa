//! Rutas de la API
//!
//! Los handlers orquestan: adquieren el lock de mutaciones, invocan el
//! servicio y, solo en el camino de éxito, registran la auditoría y
//! publican la notificación (hooks post-commit).

pub mod import_routes;
pub mod vehicle_routes;
pub mod ws_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Ensambla el router completo de la aplicación
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/vehicles",
            vehicle_routes::create_vehicle_router()
                .merge(import_routes::create_import_router()),
        )
        .route("/api/updates/ws", get(ws_routes::updates_ws))
        .layer(cors_middleware())
        .with_state(state)
}

/// Endpoint de liveness
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
