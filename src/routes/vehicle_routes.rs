//! Rutas de vehículos
//!
//! Las lecturas (list/get) no adquieren el lock y pueden observar el
//! estado anterior o posterior a una mutación concurrente. Las mutaciones
//! retienen el lock durante toda su sección crítica; la auditoría y el
//! broadcast se disparan después del commit y solo en caso de éxito.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::dto::vehicle_dto::{VehicleRequest, VehicleSummary};
use crate::middleware::auth::AuthUser;
use crate::models::user_action::{UserAction, UserActionKind};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

/// Hook post-commit: la auditoría es best-effort y no altera la
/// respuesta una vez confirmada la mutación.
async fn log_action(
    state: &AppState,
    username: &str,
    vehicle_id: Option<Uuid>,
    action: UserActionKind,
) {
    let entry = UserAction::new(username, vehicle_id, action);
    if let Err(e) = state.actions.append(entry).await {
        tracing::warn!("No se pudo registrar la auditoría de {}: {}", action, e);
    }
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleSummary>>, AppError> {
    let vehicles = state.vehicle_service.list_vehicles().await?;
    Ok(Json(vehicles))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleSummary>, AppError> {
    let vehicle = state.vehicle_service.get_vehicle(id).await?;
    Ok(Json(vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<VehicleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let vehicle = {
        let _guard = state.lock.acquire().await;
        state.vehicle_service.create(&request).await?
    };

    log_action(
        &state,
        &auth.username,
        Some(vehicle.id),
        UserActionKind::CreateVehicle,
    )
    .await;
    state.broadcaster.publish_table_update();

    Ok(Json(json!({ "id": vehicle.id })))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
    Json(request): Json<VehicleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    {
        let _guard = state.lock.acquire().await;
        state
            .vehicle_service
            .update(id, &request, &auth.username)
            .await?;
    }

    log_action(&state, &auth.username, Some(id), UserActionKind::UpdateVehicle).await;
    state.broadcaster.publish_table_update();

    Ok(Json(json!({ "id": id })))
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    /// Vehículo destino de la reasignación de coordenadas; vacío o
    /// ausente significa sin reasignación
    reassign_id: Option<String>,
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let reassign_id = match params.reassign_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| bad_request_error("reassign_id no es un UUID válido"))?,
        ),
    };

    {
        let _guard = state.lock.acquire().await;
        state
            .vehicle_service
            .delete(id, &auth.username, reassign_id)
            .await?;
    }

    log_action(&state, &auth.username, Some(id), UserActionKind::DeleteVehicle).await;
    state.broadcaster.publish_table_update();

    Ok(Json(json!({ "deleted": id })))
}
