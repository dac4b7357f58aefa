//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod coordinates;
pub mod import_status;
pub mod user;
pub mod user_action;
pub mod vehicle;
