//! Repositorio de Vehicle
//!
//! Los enums se almacenan como texto; los propietarios viven en la tabla
//! de unión vehicle_owners. Las violaciones de unicidad del nombre se
//! traducen a errores de conflicto (reintentables por el cliente).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::vehicle::{FuelType, NewVehicleRecord, Vehicle, VehicleType};
use crate::utils::errors::{conflict_error, internal_error, AppError, AppResult};

/// Interfaz del almacén de vehículos
#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn list(&self) -> AppResult<Vec<Vehicle>>;

    /// Cuántos vehículos referencian una fila de coordenadas
    async fn count_by_coordinates(&self, coordinates_id: Uuid) -> AppResult<i64>;

    async fn save(&self, record: NewVehicleRecord) -> AppResult<Vehicle>;

    /// Persiste el lote completo como una unidad: o entran todos los
    /// registros o ninguno.
    async fn save_batch(&self, records: Vec<NewVehicleRecord>) -> AppResult<Vec<Vehicle>>;

    /// Reescribe los campos mutables de un vehículo existente;
    /// creation_date es inmutable y se conserva.
    async fn update(&self, id: Uuid, record: NewVehicleRecord) -> AppResult<Vehicle>;

    /// Transfiere la referencia de coordenadas (reasignación al borrar)
    async fn set_coordinates(&self, id: Uuid, coordinates_id: Uuid) -> AppResult<()>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Debug, FromRow)]
struct VehicleRow {
    id: Uuid,
    name: String,
    coordinates_id: Uuid,
    creation_date: DateTime<Utc>,
    vehicle_type: String,
    engine_power: f64,
    number_of_wheels: i64,
    capacity: f64,
    distance_travelled: f64,
    fuel_consumption: f64,
    fuel_type: String,
    permission_to_edit: bool,
}

impl VehicleRow {
    fn into_vehicle(self, owners: Vec<String>) -> AppResult<Vehicle> {
        let vehicle_type = VehicleType::from_str(&self.vehicle_type)
            .map_err(|_| internal_error("Tipo de vehículo desconocido en la base de datos"))?;
        let fuel_type = FuelType::from_str(&self.fuel_type)
            .map_err(|_| internal_error("Tipo de combustible desconocido en la base de datos"))?;

        Ok(Vehicle {
            id: self.id,
            name: self.name,
            coordinates_id: self.coordinates_id,
            creation_date: self.creation_date,
            vehicle_type,
            engine_power: self.engine_power,
            number_of_wheels: self.number_of_wheels,
            capacity: self.capacity,
            distance_travelled: self.distance_travelled,
            fuel_consumption: self.fuel_consumption,
            fuel_type,
            permission_to_edit: self.permission_to_edit,
            owners,
        })
    }
}

/// Traducir la violación de UNIQUE (nombre duplicado) a un conflicto
fn map_save_error(e: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return conflict_error("Vehicle", "name", name);
        }
    }
    AppError::Database(e)
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn owners_of(&self, vehicle_id: Uuid) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT u.username FROM users u
            JOIN vehicle_owners vo ON vo.user_id = u.id
            WHERE vo.vehicle_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(username,)| username).collect())
    }
}

/// INSERT del vehículo y sus filas de propietarios dentro de la
/// transacción recibida.
async fn insert_vehicle(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    record: &NewVehicleRecord,
) -> Result<VehicleRow, sqlx::Error> {
    let row = sqlx::query_as::<_, VehicleRow>(
        r#"
        INSERT INTO vehicles (
            id, name, coordinates_id, creation_date, vehicle_type,
            engine_power, number_of_wheels, capacity, distance_travelled,
            fuel_consumption, fuel_type, permission_to_edit
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&record.name)
    .bind(record.coordinates_id)
    .bind(record.creation_date)
    .bind(record.vehicle_type.as_str())
    .bind(record.engine_power)
    .bind(record.number_of_wheels)
    .bind(record.capacity)
    .bind(record.distance_travelled)
    .bind(record.fuel_consumption)
    .bind(record.fuel_type.as_str())
    .bind(record.permission_to_edit)
    .fetch_one(&mut **tx)
    .await?;

    for owner in &record.owners {
        sqlx::query("INSERT INTO vehicle_owners (vehicle_id, user_id) VALUES ($1, $2)")
            .bind(row.id)
            .bind(owner.id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(row)
}

#[async_trait]
impl VehicleStore for PgVehicleRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let owners = self.owners_of(row.id).await?;
                Ok(Some(row.into_vehicle(owners)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            "SELECT * FROM vehicles ORDER BY creation_date",
        )
        .fetch_all(&self.pool)
        .await?;

        // Una sola consulta para todos los propietarios en lugar de N+1
        let owner_rows: Vec<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT vo.vehicle_id, u.username FROM vehicle_owners vo
            JOIN users u ON u.id = vo.user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut owners_by_vehicle: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (vehicle_id, username) in owner_rows {
            owners_by_vehicle.entry(vehicle_id).or_default().push(username);
        }

        rows.into_iter()
            .map(|row| {
                let owners = owners_by_vehicle.remove(&row.id).unwrap_or_default();
                row.into_vehicle(owners)
            })
            .collect()
    }

    async fn count_by_coordinates(&self, coordinates_id: Uuid) -> AppResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vehicles WHERE coordinates_id = $1")
                .bind(coordinates_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn save(&self, record: NewVehicleRecord) -> AppResult<Vehicle> {
        let mut tx = self.pool.begin().await?;
        let row = insert_vehicle(&mut tx, &record)
            .await
            .map_err(|e| map_save_error(e, &record.name))?;
        tx.commit().await?;

        let owners = record.owners.into_iter().map(|u| u.username).collect();
        row.into_vehicle(owners)
    }

    async fn save_batch(&self, records: Vec<NewVehicleRecord>) -> AppResult<Vec<Vehicle>> {
        let mut tx = self.pool.begin().await?;

        let mut saved = Vec::with_capacity(records.len());
        for record in &records {
            let row = insert_vehicle(&mut tx, record)
                .await
                .map_err(|e| map_save_error(e, &record.name))?;
            saved.push(row);
        }

        tx.commit().await?;

        saved
            .into_iter()
            .zip(records)
            .map(|(row, record)| {
                let owners = record.owners.into_iter().map(|u| u.username).collect();
                row.into_vehicle(owners)
            })
            .collect()
    }

    async fn update(&self, id: Uuid, record: NewVehicleRecord) -> AppResult<Vehicle> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            UPDATE vehicles SET
                name = $2, coordinates_id = $3, vehicle_type = $4,
                engine_power = $5, number_of_wheels = $6, capacity = $7,
                distance_travelled = $8, fuel_consumption = $9,
                fuel_type = $10, permission_to_edit = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&record.name)
        .bind(record.coordinates_id)
        .bind(record.vehicle_type.as_str())
        .bind(record.engine_power)
        .bind(record.number_of_wheels)
        .bind(record.capacity)
        .bind(record.distance_travelled)
        .bind(record.fuel_consumption)
        .bind(record.fuel_type.as_str())
        .bind(record.permission_to_edit)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_save_error(e, &record.name))?;

        sqlx::query("DELETE FROM vehicle_owners WHERE vehicle_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for owner in &record.owners {
            sqlx::query("INSERT INTO vehicle_owners (vehicle_id, user_id) VALUES ($1, $2)")
                .bind(id)
                .bind(owner.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let owners = record.owners.into_iter().map(|u| u.username).collect();
        row.into_vehicle(owners)
    }

    async fn set_coordinates(&self, id: Uuid, coordinates_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE vehicles SET coordinates_id = $2 WHERE id = $1")
            .bind(id)
            .bind(coordinates_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM vehicle_owners WHERE vehicle_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
