//! Repositorio de Coordinates
//!
//! La tabla coordinates tiene UNIQUE (x, y): la deduplicación se decide
//! bajo el lock de mutaciones con find_by_xy antes de insertar.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::coordinates::Coordinates;
use crate::utils::errors::{AppError, AppResult};

/// Interfaz del almacén de coordenadas
#[async_trait]
pub trait CoordinateStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coordinates>>;

    /// Búsqueda por el par exacto `(x, y)`
    async fn find_by_xy(&self, x: i64, y: f64) -> AppResult<Option<Coordinates>>;

    async fn save(&self, x: i64, y: f64) -> AppResult<Coordinates>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct PgCoordinatesRepository {
    pool: PgPool,
}

impl PgCoordinatesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoordinateStore for PgCoordinatesRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coordinates>> {
        let row = sqlx::query_as::<_, Coordinates>("SELECT * FROM coordinates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_xy(&self, x: i64, y: f64) -> AppResult<Option<Coordinates>> {
        let row = sqlx::query_as::<_, Coordinates>(
            "SELECT * FROM coordinates WHERE x = $1 AND y = $2",
        )
        .bind(x)
        .bind(y)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn save(&self, x: i64, y: f64) -> AppResult<Coordinates> {
        let row = sqlx::query_as::<_, Coordinates>(
            r#"
            INSERT INTO coordinates (id, x, y)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(x)
        .bind(y)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM coordinates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
