//! Repositorio de UserAction
//!
//! Append-only: se escribe una entrada después de cada mutación
//! confirmada y nunca se actualiza ni se borra.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user_action::UserAction;
use crate::utils::errors::AppResult;

/// Interfaz del log de auditoría
#[async_trait]
pub trait UserActionStore: Send + Sync {
    async fn append(&self, action: UserAction) -> AppResult<()>;
}

pub struct PgUserActionRepository {
    pool: PgPool,
}

impl PgUserActionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserActionStore for PgUserActionRepository {
    async fn append(&self, action: UserAction) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_actions (id, username, vehicle_id, action, "timestamp")
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&action.username)
        .bind(action.vehicle_id)
        .bind(action.action.as_str())
        .bind(action.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
