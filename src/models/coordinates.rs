//! Modelo de Coordinates
//!
//! Una fila por cada par `(x, y)` distinto: los vehículos con las mismas
//! coordenadas comparten la misma fila, y una fila sin vehículos que la
//! referencien se elimina.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Coordinates - mapea exactamente a la tabla coordinates
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coordinates {
    pub id: Uuid,
    pub x: i64,
    pub y: f64,
}
