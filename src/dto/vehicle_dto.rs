//! DTOs de Vehicle
//!
//! `VehicleRequest` es el payload crudo de create/update/import: todos los
//! campos obligatorios llegan como `Option` para poder reportar el campo
//! exacto que falta. `ValidatedVehicle` es el resultado tipado de la
//! validación ordenada (ver utils/validation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vehicle::{FuelType, Vehicle, VehicleType};

/// Request para crear o actualizar un vehículo (también cada registro
/// candidato de una importación masiva)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleRequest {
    pub name: Option<String>,
    pub x: Option<i64>,
    pub y: Option<f64>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub engine_power: Option<f64>,
    pub number_of_wheels: Option<i64>,
    pub capacity: Option<f64>,
    pub distance_travelled: Option<f64>,
    pub fuel_consumption: Option<f64>,
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub permission_to_edit: Option<bool>,
}

/// Campos de vehículo ya validados, con los enums parseados
#[derive(Debug, Clone)]
pub struct ValidatedVehicle {
    pub name: String,
    pub x: i64,
    pub y: f64,
    pub vehicle_type: VehicleType,
    pub engine_power: f64,
    pub number_of_wheels: i64,
    pub capacity: f64,
    pub distance_travelled: f64,
    pub fuel_consumption: f64,
    pub fuel_type: FuelType,
    pub owners: Vec<String>,
    pub permission_to_edit: Option<bool>,
}

/// Response de vehículo para listados
#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub id: Uuid,
    pub name: String,
    pub coordinates_id: Uuid,
    pub x: i64,
    pub y: f64,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub engine_power: f64,
    pub number_of_wheels: i64,
    pub capacity: f64,
    pub distance_travelled: f64,
    pub fuel_consumption: f64,
    pub fuel_type: FuelType,
    pub owners: Vec<String>,
    pub permission_to_edit: bool,
    pub creation_date: DateTime<Utc>,
}

impl VehicleSummary {
    pub fn from_vehicle(vehicle: Vehicle, x: i64, y: f64) -> Self {
        Self {
            id: vehicle.id,
            name: vehicle.name,
            coordinates_id: vehicle.coordinates_id,
            x,
            y,
            vehicle_type: vehicle.vehicle_type,
            engine_power: vehicle.engine_power,
            number_of_wheels: vehicle.number_of_wheels,
            capacity: vehicle.capacity,
            distance_travelled: vehicle.distance_travelled,
            fuel_consumption: vehicle.fuel_consumption,
            fuel_type: vehicle.fuel_type,
            owners: vehicle.owners,
            permission_to_edit: vehicle.permission_to_edit,
            creation_date: vehicle.creation_date,
        }
    }
}
