//! Servicio de mutaciones de vehículos
//!
//! Implementa create/update/delete con las reglas de propiedad y el ciclo
//! de vida de coordenadas (deduplicación, recolección de huérfanas y
//! reasignación). El servicio NO adquiere el lock de mutaciones: los
//! puntos de entrada lo mantienen durante toda la sección crítica.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::vehicle_dto::{ValidatedVehicle, VehicleRequest, VehicleSummary};
use crate::models::user::User;
use crate::models::vehicle::{NewVehicleRecord, Vehicle};
use crate::repositories::{CoordinateStore, UserStore, VehicleStore};
use crate::utils::errors::{bad_request_error, forbidden_error, not_found_error, AppError, AppResult};
use crate::utils::validation::validate_vehicle_request;

pub struct VehicleService {
    vehicles: Arc<dyn VehicleStore>,
    coordinates: Arc<dyn CoordinateStore>,
    users: Arc<dyn UserStore>,
}

impl VehicleService {
    pub fn new(
        vehicles: Arc<dyn VehicleStore>,
        coordinates: Arc<dyn CoordinateStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            vehicles,
            coordinates,
            users,
        }
    }

    /// Listado completo; lectura sin lock.
    pub async fn list_vehicles(&self) -> AppResult<Vec<VehicleSummary>> {
        let vehicles = self.vehicles.list().await?;

        let mut summaries = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            summaries.push(self.to_summary(vehicle).await?);
        }

        Ok(summaries)
    }

    pub async fn get_vehicle(&self, id: Uuid) -> AppResult<VehicleSummary> {
        let vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        self.to_summary(vehicle).await
    }

    async fn to_summary(&self, vehicle: Vehicle) -> AppResult<VehicleSummary> {
        let coordinates = self
            .coordinates
            .find_by_id(vehicle.coordinates_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal("Vehículo sin fila de coordenadas asociada".to_string())
            })?;

        Ok(VehicleSummary::from_vehicle(vehicle, coordinates.x, coordinates.y))
    }

    /// Resuelve la identidad del token contra la tabla de usuarios.
    pub async fn resolve_actor(&self, username: &str) -> AppResult<User> {
        self.users.find_by_username(username).await?.ok_or_else(|| {
            AppError::Unauthorized(
                "El token no corresponde a ningún usuario registrado".to_string(),
            )
        })
    }

    /// Los nombres de propietario desconocidos se descartan en silencio;
    /// no son un error de validación.
    async fn resolve_owners(&self, names: &[String]) -> AppResult<Vec<User>> {
        let lookups = names.iter().map(|name| self.users.find_by_username(name));
        let results = futures::future::join_all(lookups).await;

        let mut owners = Vec::new();
        for (name, result) in names.iter().zip(results) {
            match result? {
                Some(user) => owners.push(user),
                None => {
                    tracing::debug!("Propietario desconocido '{}' descartado", name);
                }
            }
        }
        Ok(owners)
    }

    /// Deduplicación: reutiliza la fila existente para el par exacto
    /// `(x, y)` o crea una nueva.
    async fn resolve_coordinates(&self, x: i64, y: f64) -> AppResult<Uuid> {
        if let Some(existing) = self.coordinates.find_by_xy(x, y).await? {
            return Ok(existing.id);
        }
        Ok(self.coordinates.save(x, y).await?.id)
    }

    /// Borra la fila de coordenadas si quedó sin vehículos que la
    /// referencien. Se usa tras una escritura fallida para no dejar
    /// huérfana la fila recién deduplicada.
    async fn collect_if_orphan(&self, coordinates_id: Uuid) {
        match self.vehicles.count_by_coordinates(coordinates_id).await {
            Ok(0) => {
                if let Err(e) = self.coordinates.delete(coordinates_id).await {
                    tracing::warn!(
                        "No se pudo recolectar coordenadas {}: {}",
                        coordinates_id,
                        e
                    );
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    "No se pudo contar referencias de {}: {}",
                    coordinates_id,
                    e
                );
            }
        }
    }

    /// Convierte campos validados en un registro persistible: propietarios
    /// resueltos, permission_to_edit derivado y coordenadas deduplicadas.
    pub async fn build_record(
        &self,
        validated: ValidatedVehicle,
        creation_date: DateTime<Utc>,
    ) -> AppResult<NewVehicleRecord> {
        let owners = self.resolve_owners(&validated.owners).await?;

        // Un vehículo sin propietarios siempre queda globalmente editable
        let permission_to_edit = if owners.is_empty() {
            true
        } else {
            validated.permission_to_edit.unwrap_or(false)
        };

        let coordinates_id = self.resolve_coordinates(validated.x, validated.y).await?;

        Ok(NewVehicleRecord {
            name: validated.name,
            coordinates_id,
            creation_date,
            vehicle_type: validated.vehicle_type,
            engine_power: validated.engine_power,
            number_of_wheels: validated.number_of_wheels,
            capacity: validated.capacity,
            distance_travelled: validated.distance_travelled,
            fuel_consumption: validated.fuel_consumption,
            fuel_type: validated.fuel_type,
            owners,
            permission_to_edit,
        })
    }

    /// Crea un vehículo. Validación fail-fast: el primer campo inválido
    /// corta y se reporta solo ese campo, sin efectos persistidos.
    pub async fn create(&self, request: &VehicleRequest) -> AppResult<Vehicle> {
        let validated = validate_vehicle_request(request)?;
        let record = self.build_record(validated, Utc::now()).await?;
        let coordinates_id = record.coordinates_id;

        match self.vehicles.save(record).await {
            Ok(vehicle) => Ok(vehicle),
            Err(e) => {
                // El vehículo no llegó a commit: si la fila de coordenadas
                // se creó para este registro quedó sin referencias
                self.collect_if_orphan(coordinates_id).await;
                Err(e)
            }
        }
    }

    /// Actualiza un vehículo existente. creation_date es inmutable; si el
    /// par `(x, y)` cambió se rededuplica y la fila anterior se recolecta
    /// cuando queda sin referencias.
    pub async fn update(
        &self,
        id: Uuid,
        request: &VehicleRequest,
        actor_username: &str,
    ) -> AppResult<Vehicle> {
        let actor = self.resolve_actor(actor_username).await?;

        let current = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if !current.can_be_modified_by(&actor) {
            return Err(forbidden_error(
                "update vehicle",
                "no eres propietario ni administrador con permiso de edición",
            ));
        }

        let validated = validate_vehicle_request(request)?;
        let old_coordinates_id = current.coordinates_id;

        let record = self.build_record(validated, current.creation_date).await?;
        let new_coordinates_id = record.coordinates_id;

        let updated = match self.vehicles.update(id, record).await {
            Ok(updated) => updated,
            Err(e) => {
                if new_coordinates_id != old_coordinates_id {
                    self.collect_if_orphan(new_coordinates_id).await;
                }
                return Err(e);
            }
        };

        if new_coordinates_id != old_coordinates_id
            && self.vehicles.count_by_coordinates(old_coordinates_id).await? == 0
        {
            self.coordinates.delete(old_coordinates_id).await?;
        }

        Ok(updated)
    }

    /// Elimina un vehículo. Sin reasignación, su fila de coordenadas se
    /// borra cuando queda huérfana; con reasignación, la fila se
    /// transfiere intacta al vehículo destino.
    pub async fn delete(
        &self,
        id: Uuid,
        actor_username: &str,
        reassign_id: Option<Uuid>,
    ) -> AppResult<()> {
        let actor = self.resolve_actor(actor_username).await?;

        let vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if !vehicle.can_be_modified_by(&actor) {
            return Err(forbidden_error(
                "delete vehicle",
                "no eres propietario ni administrador con permiso de edición",
            ));
        }

        match reassign_id {
            Some(target_id) => {
                // Reasignar al propio vehículo dejaría la fila de
                // coordenadas sin referencias y sin recolectar
                if target_id == id {
                    return Err(bad_request_error(
                        "reassign_id no puede ser el vehículo que se elimina",
                    ));
                }

                let target = self
                    .vehicles
                    .find_by_id(target_id)
                    .await?
                    .ok_or_else(|| {
                        not_found_error("Reassign target vehicle", &target_id.to_string())
                    })?;

                let allowed = (target.owners.is_empty() && actor.is_admin())
                    || target.owners.iter().any(|o| o == &actor.username);
                if !allowed {
                    return Err(forbidden_error(
                        "reassign coordinates",
                        "el vehículo destino no te pertenece",
                    ));
                }

                // La fila de coordenadas anterior del destino puede quedar
                // huérfana sin limpieza: comportamiento observado que se
                // conserva tal cual.
                self.vehicles
                    .set_coordinates(target.id, vehicle.coordinates_id)
                    .await?;
                self.vehicles.delete(id).await?;
            }
            None => {
                let coordinates_id = vehicle.coordinates_id;
                self.vehicles.delete(id).await?;
                if self.vehicles.count_by_coordinates(coordinates_id).await? == 0 {
                    self.coordinates.delete(coordinates_id).await?;
                }
            }
        }

        Ok(())
    }
}
