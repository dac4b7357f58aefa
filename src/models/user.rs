//! Modelo de User
//!
//! Los usuarios son un colaborador externo: este core solo los lee para
//! resolver propietarios y verificar el rol de administrador.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rol de administrador en la tabla user_roles
pub const ADMIN_ROLE: &str = "ADMIN";

/// User - mapea a la tabla users junto con sus roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl User {
    /// Verifica si el usuario tiene el rol de administrador
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }
}
