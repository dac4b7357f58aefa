//! Validación de vehículos
//!
//! Lista ordenada de validadores independientes sobre el request tipado.
//! Las rutas de registro único fallan en el primer error (se reporta un
//! solo campo); la importación masiva acumula todos los errores por
//! registro antes de rechazar el lote completo.

use std::str::FromStr;

use crate::dto::vehicle_dto::{ValidatedVehicle, VehicleRequest};
use crate::models::vehicle::{FuelType, VehicleType};
use crate::utils::errors::{validation_error, AppError};

/// Límite inferior exclusivo de la coordenada X
pub const MIN_X_EXCLUSIVE: i64 = -308;

/// Error de validación de un campo concreto
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<FieldError> for AppError {
    fn from(e: FieldError) -> Self {
        validation_error(e.field, e.message)
    }
}

/// Valida un request en el orden de los campos y devuelve el primer error.
pub fn validate_vehicle_request(request: &VehicleRequest) -> Result<ValidatedVehicle, FieldError> {
    let name = match request.name.as_deref() {
        None => return Err(FieldError::new("name", "El nombre es requerido")),
        Some(n) if n.is_empty() => {
            return Err(FieldError::new("name", "El nombre no puede estar vacío"))
        }
        Some(n) if n.chars().count() > 255 => {
            return Err(FieldError::new(
                "name",
                "El nombre no puede superar los 255 caracteres",
            ))
        }
        Some(n) => n.to_string(),
    };

    let x = match request.x {
        None => return Err(FieldError::new("x", "La coordenada X es requerida")),
        Some(x) if x <= MIN_X_EXCLUSIVE => {
            return Err(FieldError::new("x", "La coordenada X debe ser mayor que -308"))
        }
        Some(x) => x,
    };

    let y = match request.y {
        None => return Err(FieldError::new("y", "La coordenada Y es requerida")),
        // NaN falla ambas comparaciones y se rechaza también
        Some(y) if !(y >= f64::MIN_POSITIVE && y < f64::MAX) => {
            return Err(FieldError::new(
                "y",
                "La coordenada Y debe ser positiva y menor que el máximo representable",
            ))
        }
        Some(y) => y,
    };

    let vehicle_type = match request.vehicle_type.as_deref() {
        None => {
            return Err(FieldError::new(
                "type",
                "El tipo de vehículo es requerido",
            ))
        }
        Some(t) if t.is_empty() => {
            return Err(FieldError::new(
                "type",
                "El tipo de vehículo no puede estar vacío",
            ))
        }
        Some(t) => VehicleType::from_str(t)
            .map_err(|_| FieldError::new("type", "Tipo de vehículo inválido"))?,
    };

    let engine_power = match request.engine_power {
        None => {
            return Err(FieldError::new(
                "engine_power",
                "La potencia del motor es requerida",
            ))
        }
        Some(p) if !(p > 0.0 && p.is_finite()) => {
            return Err(FieldError::new(
                "engine_power",
                "La potencia del motor debe ser mayor que 0",
            ))
        }
        Some(p) => p,
    };

    let number_of_wheels = match request.number_of_wheels {
        None => {
            return Err(FieldError::new(
                "number_of_wheels",
                "El número de ruedas es requerido",
            ))
        }
        Some(w) if w <= 0 => {
            return Err(FieldError::new(
                "number_of_wheels",
                "El número de ruedas debe ser mayor que 0",
            ))
        }
        Some(w) => w,
    };

    let capacity = match request.capacity {
        None => return Err(FieldError::new("capacity", "La capacidad es requerida")),
        Some(c) if !(c > 0.0 && c.is_finite()) => {
            return Err(FieldError::new(
                "capacity",
                "La capacidad debe ser mayor que 0",
            ))
        }
        Some(c) => c,
    };

    let distance_travelled = match request.distance_travelled {
        None => {
            return Err(FieldError::new(
                "distance_travelled",
                "El kilometraje es requerido",
            ))
        }
        Some(d) if !(d > 0.0 && d.is_finite()) => {
            return Err(FieldError::new(
                "distance_travelled",
                "El kilometraje debe ser mayor que 0",
            ))
        }
        Some(d) => d,
    };

    let fuel_consumption = match request.fuel_consumption {
        None => {
            return Err(FieldError::new(
                "fuel_consumption",
                "El consumo de combustible es requerido",
            ))
        }
        Some(f) if !(f > 0.0 && f.is_finite()) => {
            return Err(FieldError::new(
                "fuel_consumption",
                "El consumo de combustible debe ser mayor que 0",
            ))
        }
        Some(f) => f,
    };

    let fuel_type = match request.fuel_type.as_deref() {
        None => {
            return Err(FieldError::new(
                "fuel_type",
                "El tipo de combustible es requerido",
            ))
        }
        Some(t) if t.is_empty() => {
            return Err(FieldError::new(
                "fuel_type",
                "El tipo de combustible no puede estar vacío",
            ))
        }
        Some(t) => FuelType::from_str(t)
            .map_err(|_| FieldError::new("fuel_type", "Tipo de combustible inválido"))?,
    };

    Ok(ValidatedVehicle {
        name,
        x,
        y,
        vehicle_type,
        engine_power,
        number_of_wheels,
        capacity,
        distance_travelled,
        fuel_consumption,
        fuel_type,
        owners: request.owners.clone(),
        permission_to_edit: request.permission_to_edit,
    })
}
