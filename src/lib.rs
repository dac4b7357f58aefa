//! Backend de inventario de vehículos
//!
//! Inventario compartido de vehículos con mutaciones serializadas por un
//! lock global, deduplicación de coordenadas, importación masiva en
//! background y notificaciones de cambio por WebSocket.

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
