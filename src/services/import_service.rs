//! Runner de importación masiva
//!
//! Una importación es una única operación bulk-create atómica: se decodifica
//! el archivo, se validan TODOS los candidatos acumulando errores (a
//! diferencia del fail-fast de create) y, solo si todos son válidos, se
//! confirman como una unidad. Todo el decode + validate + commit ocurre
//! bajo el lock de mutaciones, así que ninguna mutación individual puede
//! observar una importación a medio aplicar. El resultado queda en el
//! registry y se consulta por polling.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::vehicle_dto::VehicleRequest;
use crate::models::import_status::ImportStatus;
use crate::models::user_action::{UserAction, UserActionKind};
use crate::services::import_registry::ImportRegistry;
use crate::services::update_broadcaster::UpdateBroadcaster;
use crate::services::vehicle_service::VehicleService;
use crate::repositories::{CoordinateStore, UserActionStore, VehicleStore};
use crate::utils::errors::AppError;
use crate::utils::lock::ResourceLock;
use crate::utils::validation::validate_vehicle_request;

/// Taxonomía de fallos de importación. Solo los fallos de persistencia
/// son reintentables por el cliente sin cambiar la entrada.
#[derive(Debug)]
enum ImportFailure {
    /// El archivo no se pudo decodificar en absoluto
    Malformed(String),
    /// Uno o más registros violan las reglas de campos
    Invalid(Vec<String>),
    /// El commit falló (p. ej. nombre duplicado)
    Persistence(String),
}

impl ImportFailure {
    fn detail(&self) -> String {
        match self {
            ImportFailure::Malformed(msg) => format!("entrada malformada: {}", msg),
            ImportFailure::Invalid(errors) => format!("validación: {}", errors.join("; ")),
            ImportFailure::Persistence(msg) => {
                format!("persistencia: {} (reintentable)", msg)
            }
        }
    }
}

/// Reporte generado como artefacto descargable de un import exitoso
#[derive(Debug, Serialize)]
struct ImportReport {
    generated_at: chrono::DateTime<Utc>,
    imported_count: usize,
    vehicles: Vec<ImportReportEntry>,
}

#[derive(Debug, Serialize)]
struct ImportReportEntry {
    id: Uuid,
    name: String,
}

#[derive(Clone)]
pub struct ImportService {
    service: Arc<VehicleService>,
    vehicles: Arc<dyn VehicleStore>,
    coordinates: Arc<dyn CoordinateStore>,
    actions: Arc<dyn UserActionStore>,
    registry: ImportRegistry,
    broadcaster: UpdateBroadcaster,
    lock: ResourceLock,
    artifact_dir: PathBuf,
}

impl ImportService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        service: Arc<VehicleService>,
        vehicles: Arc<dyn VehicleStore>,
        coordinates: Arc<dyn CoordinateStore>,
        actions: Arc<dyn UserActionStore>,
        registry: ImportRegistry,
        broadcaster: UpdateBroadcaster,
        lock: ResourceLock,
        artifact_dir: PathBuf,
    ) -> Self {
        Self {
            service,
            vehicles,
            coordinates,
            actions,
            registry,
            broadcaster,
            lock,
            artifact_dir,
        }
    }

    /// Registra el intento como PENDING y lanza el job en background.
    /// El estado es observable por polling mientras el job espera el lock
    /// y mientras lo retiene.
    pub async fn submit(&self, bytes: Vec<u8>, username: String) {
        self.registry.set(&username, ImportStatus::pending()).await;
        self.broadcaster.publish_import_status();

        let runner = self.clone();
        tokio::spawn(async move {
            runner.run(bytes, username).await;
        });
    }

    /// Sección crítica completa del job: una importación en curso bloquea
    /// las mutaciones individuales y viceversa.
    async fn run(&self, bytes: Vec<u8>, username: String) {
        let _guard = self.lock.acquire().await;

        match self.process(&bytes).await {
            Ok((count, artifact)) => {
                tracing::info!(
                    "Importación de '{}' confirmada: {} vehículos",
                    username,
                    count
                );
                self.registry
                    .set(&username, ImportStatus::success(count, artifact))
                    .await;

                let action =
                    UserAction::new(&username, None, UserActionKind::ImportVehicles);
                if let Err(e) = self.actions.append(action).await {
                    tracing::warn!("No se pudo registrar la auditoría del import: {}", e);
                }

                self.broadcaster.publish_table_update();
            }
            Err(failure) => {
                let detail = failure.detail();
                tracing::warn!("Importación de '{}' rechazada: {}", username, detail);
                self.registry
                    .set(&username, ImportStatus::error(detail))
                    .await;
            }
        }

        // El registro del registry cambió en ambos desenlaces
        self.broadcaster.publish_import_status();
    }

    async fn process(&self, bytes: &[u8]) -> Result<(i64, Option<String>), ImportFailure> {
        // Decoder opaco: un array JSON de registros candidatos
        let candidates: Vec<VehicleRequest> = serde_json::from_slice(bytes)
            .map_err(|e| ImportFailure::Malformed(e.to_string()))?;

        // Validar todos los candidatos acumulando errores: si alguno
        // falla se rechaza el lote completo sin commit parcial
        let mut validated = Vec::with_capacity(candidates.len());
        let mut errors = Vec::new();
        for (index, candidate) in candidates.iter().enumerate() {
            match validate_vehicle_request(candidate) {
                Ok(v) => validated.push(v),
                Err(e) => errors.push(format!("registro {}: {}", index + 1, e)),
            }
        }
        if !errors.is_empty() {
            return Err(ImportFailure::Invalid(errors));
        }

        // Resolver propietarios y coordenadas (la deduplicación también
        // aplica entre candidatos del mismo lote)
        let mut records = Vec::with_capacity(validated.len());
        for v in validated {
            let record = self
                .service
                .build_record(v, Utc::now())
                .await
                .map_err(|e| ImportFailure::Persistence(e.to_string()))?;
            records.push(record);
        }

        let coordinate_ids: HashSet<Uuid> =
            records.iter().map(|r| r.coordinates_id).collect();

        let saved = match self.vehicles.save_batch(records).await {
            Ok(saved) => saved,
            Err(e) => {
                // Las filas de coordenadas creadas para un lote que no
                // llegó a commit quedan sin referencias: recolectarlas
                self.collect_orphan_coordinates(&coordinate_ids).await;
                let msg = match e {
                    AppError::Conflict(msg) => msg,
                    other => other.to_string(),
                };
                return Err(ImportFailure::Persistence(msg));
            }
        };

        let artifact = self.write_artifact(&saved).await;

        Ok((saved.len() as i64, artifact))
    }

    async fn collect_orphan_coordinates(&self, ids: &HashSet<Uuid>) {
        for id in ids {
            match self.vehicles.count_by_coordinates(*id).await {
                Ok(0) => {
                    if let Err(e) = self.coordinates.delete(*id).await {
                        tracing::warn!("No se pudo recolectar coordenadas {}: {}", id, e);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("No se pudo contar referencias de {}: {}", id, e);
                }
            }
        }
    }

    /// El artefacto es best-effort: si no se puede escribir, el import
    /// sigue siendo SUCCESS pero sin archivo descargable.
    async fn write_artifact(
        &self,
        saved: &[crate::models::vehicle::Vehicle],
    ) -> Option<String> {
        let report = ImportReport {
            generated_at: Utc::now(),
            imported_count: saved.len(),
            vehicles: saved
                .iter()
                .map(|v| ImportReportEntry {
                    id: v.id,
                    name: v.name.clone(),
                })
                .collect(),
        };

        let filename = format!("import-{}.json", Uuid::new_v4());
        let path = self.artifact_dir.join(&filename);

        let body = match serde_json::to_vec_pretty(&report) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("No se pudo serializar el reporte de import: {}", e);
                return None;
            }
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.artifact_dir).await {
            tracing::error!("No se pudo crear el directorio de artefactos: {}", e);
            return None;
        }
        if let Err(e) = tokio::fs::write(&path, body).await {
            tracing::error!("No se pudo escribir el artefacto {}: {}", filename, e);
            return None;
        }

        Some(filename)
    }
}
