//! Repositorio de User
//!
//! Solo lectura desde este core: resolución de identidad del token y de
//! los nombres de propietarios recibidos en create/import.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::errors::AppResult;

/// Interfaz de resolución de usuarios
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row: Option<(Uuid, String)> =
            sqlx::query_as("SELECT id, username FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let Some((id, username)) = row else {
            return Ok(None);
        };

        let roles: Vec<(String,)> =
            sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Some(User {
            id,
            username,
            roles: roles.into_iter().map(|(r,)| r).collect(),
        }))
    }
}
