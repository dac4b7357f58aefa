//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: configuración, stores, el lock global de
//! mutaciones, el registry de importaciones y el broadcaster.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    CoordinateStore, PgCoordinatesRepository, PgUserActionRepository, PgUserRepository,
    PgVehicleRepository, UserActionStore, UserStore, VehicleStore,
};
use crate::services::{ImportRegistry, ImportService, UpdateBroadcaster, VehicleService};
use crate::utils::lock::ResourceLock;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    /// Puerta única de exclusión mutua de todas las mutaciones
    pub lock: ResourceLock,
    pub registry: ImportRegistry,
    pub broadcaster: UpdateBroadcaster,
    pub actions: Arc<dyn UserActionStore>,
    pub vehicle_service: Arc<VehicleService>,
    pub import_service: Arc<ImportService>,
}

impl AppState {
    /// Estado de producción sobre PostgreSQL
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let vehicles: Arc<dyn VehicleStore> =
            Arc::new(PgVehicleRepository::new(pool.clone()));
        let coordinates: Arc<dyn CoordinateStore> =
            Arc::new(PgCoordinatesRepository::new(pool.clone()));
        let users: Arc<dyn UserStore> = Arc::new(PgUserRepository::new(pool.clone()));
        let actions: Arc<dyn UserActionStore> =
            Arc::new(PgUserActionRepository::new(pool));

        Self::with_stores(config, vehicles, coordinates, users, actions)
    }

    /// Estado sobre stores arbitrarios (los tests inyectan stores en
    /// memoria por aquí)
    pub fn with_stores(
        config: EnvironmentConfig,
        vehicles: Arc<dyn VehicleStore>,
        coordinates: Arc<dyn CoordinateStore>,
        users: Arc<dyn UserStore>,
        actions: Arc<dyn UserActionStore>,
    ) -> Self {
        let lock = ResourceLock::new();
        let registry = ImportRegistry::new();
        let broadcaster = UpdateBroadcaster::new();

        let vehicle_service = Arc::new(VehicleService::new(
            vehicles.clone(),
            coordinates.clone(),
            users,
        ));

        let import_service = Arc::new(ImportService::new(
            vehicle_service.clone(),
            vehicles,
            coordinates,
            actions.clone(),
            registry.clone(),
            broadcaster.clone(),
            lock.clone(),
            config.import_artifact_dir.clone(),
        ));

        Self {
            config,
            lock,
            registry,
            broadcaster,
            actions,
            vehicle_service,
            import_service,
        }
    }
}
