//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT y el lock global de mutaciones.

pub mod errors;
pub mod jwt;
pub mod lock;
pub mod validation;
