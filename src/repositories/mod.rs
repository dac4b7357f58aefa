//! Repositorios de persistencia
//!
//! Cada repositorio expone un trait (la interfaz que consume el core) y su
//! implementación sobre PostgreSQL. Los repositorios no adquieren el lock
//! de mutaciones: eso es responsabilidad de los puntos de entrada.

pub mod coordinates_repository;
pub mod user_action_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use coordinates_repository::{CoordinateStore, PgCoordinatesRepository};
pub use user_action_repository::{PgUserActionRepository, UserActionStore};
pub use user_repository::{PgUserRepository, UserStore};
pub use vehicle_repository::{PgVehicleRepository, VehicleStore};
