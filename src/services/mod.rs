//! Services module
//!
//! Este módulo contiene la lógica de negocio: las mutaciones de vehículos
//! bajo el lock global, el runner de importación masiva, el registry de
//! estados de importación y el broadcaster de notificaciones.

pub mod import_registry;
pub mod import_service;
pub mod update_broadcaster;
pub mod vehicle_service;

pub use import_registry::ImportRegistry;
pub use import_service::ImportService;
pub use update_broadcaster::UpdateBroadcaster;
pub use vehicle_service::VehicleService;
