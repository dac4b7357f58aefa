//! Modelo de ImportStatus
//!
//! Un registro vivo por solicitante con el resultado del último intento de
//! importación. Cada intento nuevo sobreescribe al anterior: no se guarda
//! historial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado del último intento de importación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportState {
    Pending,
    Success,
    Error,
}

/// ImportStatus - registro por usuario en el registry en memoria
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStatus {
    pub status: ImportState,
    pub added_count: i64,
    /// Nombre del artefacto descargable generado por un import exitoso
    pub artifact: Option<String>,
    /// Detalle agregado de errores cuando status es ERROR
    pub detail: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ImportStatus {
    pub fn pending() -> Self {
        Self {
            status: ImportState::Pending,
            added_count: 0,
            artifact: None,
            detail: None,
            updated_at: Utc::now(),
        }
    }

    pub fn success(added_count: i64, artifact: Option<String>) -> Self {
        Self {
            status: ImportState::Success,
            added_count,
            artifact,
            detail: None,
            updated_at: Utc::now(),
        }
    }

    pub fn error(detail: String) -> Self {
        Self {
            status: ImportState::Error,
            added_count: 0,
            artifact: None,
            detail: Some(detail),
            updated_at: Utc::now(),
        }
    }
}
