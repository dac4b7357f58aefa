//! DTOs de la API
//!
//! Payloads de entrada y salida de la capa HTTP.

pub mod vehicle_dto;
