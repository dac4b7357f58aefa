//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus enums. Los enums se
//! almacenan como texto en PostgreSQL y se parsean con `from_str` al
//! validar requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::user::User;

/// Tipo de vehículo - almacenado como texto
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Plane,
    Ship,
    Bicycle,
    Chopper,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Plane => "PLANE",
            VehicleType::Ship => "SHIP",
            VehicleType::Bicycle => "BICYCLE",
            VehicleType::Chopper => "CHOPPER",
        }
    }
}

impl FromStr for VehicleType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PLANE" => Ok(VehicleType::Plane),
            "SHIP" => Ok(VehicleType::Ship),
            "BICYCLE" => Ok(VehicleType::Bicycle),
            "CHOPPER" => Ok(VehicleType::Chopper),
            _ => Err(()),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de combustible - almacenado como texto
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Kerosene,
    Electricity,
    Diesel,
    Manpower,
    Nuclear,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Kerosene => "KEROSENE",
            FuelType::Electricity => "ELECTRICITY",
            FuelType::Diesel => "DIESEL",
            FuelType::Manpower => "MANPOWER",
            FuelType::Nuclear => "NUCLEAR",
        }
    }
}

impl FromStr for FuelType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "KEROSENE" => Ok(FuelType::Kerosene),
            "ELECTRICITY" => Ok(FuelType::Electricity),
            "DIESEL" => Ok(FuelType::Diesel),
            "MANPOWER" => Ok(FuelType::Manpower),
            "NUCLEAR" => Ok(FuelType::Nuclear),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal - la tabla vehicles más sus propietarios
/// (tabla de unión vehicle_owners)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub coordinates_id: Uuid,
    pub creation_date: DateTime<Utc>,
    pub vehicle_type: VehicleType,
    pub engine_power: f64,
    pub number_of_wheels: i64,
    pub capacity: f64,
    pub distance_travelled: f64,
    pub fuel_consumption: f64,
    pub fuel_type: FuelType,
    pub owners: Vec<String>,
    pub permission_to_edit: bool,
}

impl Vehicle {
    /// Regla de propiedad: un vehículo sin propietarios es editable por
    /// cualquiera; con propietarios, solo por un propietario o por un
    /// administrador cuando permission_to_edit está activo.
    pub fn can_be_modified_by(&self, user: &User) -> bool {
        if self.owners.is_empty() {
            return true;
        }
        if self.owners.iter().any(|o| o == &user.username) {
            return true;
        }
        user.is_admin() && self.permission_to_edit
    }
}

/// Registro listo para persistir: campos ya validados y propietarios
/// ya resueltos a usuarios existentes.
#[derive(Debug, Clone)]
pub struct NewVehicleRecord {
    pub name: String,
    pub coordinates_id: Uuid,
    pub creation_date: DateTime<Utc>,
    pub vehicle_type: VehicleType,
    pub engine_power: f64,
    pub number_of_wheels: i64,
    pub capacity: f64,
    pub distance_travelled: f64,
    pub fuel_consumption: f64,
    pub fuel_type: FuelType,
    pub owners: Vec<User>,
    pub permission_to_edit: bool,
}
