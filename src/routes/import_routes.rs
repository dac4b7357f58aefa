//! Rutas de importación masiva
//!
//! El submit encola el job en background y responde de inmediato; el
//! progreso se consulta por polling en /import/status y el reporte se
//! descarga por /import/download. El contenido del archivo llega como
//! cuerpo crudo del request (el decoder es un colaborador opaco).

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_import_router() -> Router<AppState> {
    Router::new()
        .route("/import", post(import_vehicles))
        .route("/import/status", get(import_status))
        .route("/import/download", get(download_artifact))
}

async fn import_vehicles(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    // La identidad se resuelve antes de aceptar el job: un token que no
    // corresponde a un usuario registrado no puede encolar nada
    state.vehicle_service.resolve_actor(&auth.username).await?;

    state
        .import_service
        .submit(body.to_vec(), auth.username)
        .await;

    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "PENDING" }))))
}

async fn import_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.registry.get(&auth.username).await {
        Some(status) => Ok(Json(serde_json::to_value(status).map_err(|e| {
            AppError::Internal(format!("No se pudo serializar el estado: {}", e))
        })?)),
        // Indicador de "sin importaciones todavía"
        None => Ok(Json(json!({ "status": "NONE" }))),
    }
}

#[derive(Debug, Deserialize)]
struct DownloadParams {
    filename: String,
}

async fn download_artifact(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    // Solo se entrega el artefacto del último intento del propio usuario
    if !state
        .registry
        .owns_artifact(&auth.username, &params.filename)
        .await
    {
        return Err(AppError::NotFound(format!(
            "No existe el artefacto '{}' para este usuario",
            params.filename
        )));
    }

    let path = state.config.import_artifact_dir.join(&params.filename);
    let body = tokio::fs::read(&path).await.map_err(|e| {
        AppError::Internal(format!("No se pudo leer el artefacto: {}", e))
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    ))
}
