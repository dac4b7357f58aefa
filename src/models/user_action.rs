//! Modelo de UserAction
//!
//! Registro de auditoría append-only: una entrada por cada mutación
//! confirmada. Nunca se modifica ni se elimina desde este core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Acción registrada en la auditoría
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserActionKind {
    CreateVehicle,
    UpdateVehicle,
    DeleteVehicle,
    ImportVehicles,
}

impl UserActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserActionKind::CreateVehicle => "CREATE_VEHICLE",
            UserActionKind::UpdateVehicle => "UPDATE_VEHICLE",
            UserActionKind::DeleteVehicle => "DELETE_VEHICLE",
            UserActionKind::ImportVehicles => "IMPORT_VEHICLES",
        }
    }
}

impl fmt::Display for UserActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UserAction - mapea a la tabla user_actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAction {
    pub username: String,
    pub vehicle_id: Option<Uuid>,
    pub action: UserActionKind,
    pub timestamp: DateTime<Utc>,
}

impl UserAction {
    pub fn new(username: &str, vehicle_id: Option<Uuid>, action: UserActionKind) -> Self {
        Self {
            username: username.to_string(),
            vehicle_id,
            action,
            timestamp: Utc::now(),
        }
    }
}
