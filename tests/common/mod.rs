//! Helpers compartidos de los tests de integración: stores en memoria,
//! construcción de la app real y emisión de tokens.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use uuid::Uuid;

use vehicle_inventory::config::environment::EnvironmentConfig;
use vehicle_inventory::models::coordinates::Coordinates;
use vehicle_inventory::models::user::{User, ADMIN_ROLE};
use vehicle_inventory::models::user_action::UserAction;
use vehicle_inventory::models::vehicle::{NewVehicleRecord, Vehicle};
use vehicle_inventory::repositories::{
    CoordinateStore, UserActionStore, UserStore, VehicleStore,
};
use vehicle_inventory::routes::build_router;
use vehicle_inventory::state::AppState;
use vehicle_inventory::utils::errors::{conflict_error, not_found_error, AppResult};
use vehicle_inventory::utils::jwt::generate_token;

pub const TEST_SECRET: &str = "test-secret";

// ---------------------------------------------------------------------------
// Stores en memoria
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryCoordinateStore {
    rows: Mutex<HashMap<Uuid, Coordinates>>,
}

impl MemoryCoordinateStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.rows.lock().unwrap().contains_key(&id)
    }
}

#[async_trait]
impl CoordinateStore for MemoryCoordinateStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coordinates>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_xy(&self, x: i64, y: f64) -> AppResult<Option<Coordinates>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|c| c.x == x && c.y.to_bits() == y.to_bits())
            .cloned())
    }

    async fn save(&self, x: i64, y: f64) -> AppResult<Coordinates> {
        let row = Coordinates {
            id: Uuid::new_v4(),
            x,
            y,
        };
        self.rows.lock().unwrap().insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryVehicleStore {
    rows: Mutex<HashMap<Uuid, Vehicle>>,
}

impl MemoryVehicleStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn to_vehicle(record: &NewVehicleRecord, id: Uuid) -> Vehicle {
        let mut owners: Vec<String> =
            record.owners.iter().map(|u| u.username.clone()).collect();
        owners.sort();

        Vehicle {
            id,
            name: record.name.clone(),
            coordinates_id: record.coordinates_id,
            creation_date: record.creation_date,
            vehicle_type: record.vehicle_type,
            engine_power: record.engine_power,
            number_of_wheels: record.number_of_wheels,
            capacity: record.capacity,
            distance_travelled: record.distance_travelled,
            fuel_consumption: record.fuel_consumption,
            fuel_type: record.fuel_type,
            owners,
            permission_to_edit: record.permission_to_edit,
        }
    }
}

#[async_trait]
impl VehicleStore for MemoryVehicleStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> =
            self.rows.lock().unwrap().values().cloned().collect();
        vehicles.sort_by(|a, b| {
            a.creation_date
                .cmp(&b.creation_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(vehicles)
    }

    async fn count_by_coordinates(&self, coordinates_id: Uuid) -> AppResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.coordinates_id == coordinates_id)
            .count() as i64)
    }

    async fn save(&self, record: NewVehicleRecord) -> AppResult<Vehicle> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|v| v.name == record.name) {
            return Err(conflict_error("Vehicle", "name", &record.name));
        }
        let vehicle = Self::to_vehicle(&record, Uuid::new_v4());
        rows.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn save_batch(&self, records: Vec<NewVehicleRecord>) -> AppResult<Vec<Vehicle>> {
        let mut rows = self.rows.lock().unwrap();

        // Todo o nada: se verifica la unicidad del lote completo antes
        // de insertar nada
        for (index, record) in records.iter().enumerate() {
            let duplicate_in_store = rows.values().any(|v| v.name == record.name);
            let duplicate_in_batch = records[..index]
                .iter()
                .any(|other| other.name == record.name);
            if duplicate_in_store || duplicate_in_batch {
                return Err(conflict_error("Vehicle", "name", &record.name));
            }
        }

        let mut saved = Vec::with_capacity(records.len());
        for record in &records {
            let vehicle = Self::to_vehicle(record, Uuid::new_v4());
            rows.insert(vehicle.id, vehicle.clone());
            saved.push(vehicle);
        }
        Ok(saved)
    }

    async fn update(&self, id: Uuid, record: NewVehicleRecord) -> AppResult<Vehicle> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|v| v.id != id && v.name == record.name) {
            return Err(conflict_error("Vehicle", "name", &record.name));
        }
        let current = rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        let mut updated = Self::to_vehicle(&record, id);
        // creation_date es inmutable
        updated.creation_date = current.creation_date;
        rows.insert(id, updated.clone());
        Ok(updated)
    }

    async fn set_coordinates(&self, id: Uuid, coordinates_id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(vehicle) = rows.get_mut(&id) {
            vehicle.coordinates_id = coordinates_id;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }
}

pub struct MemoryUserStore {
    users: Vec<User>,
}

impl MemoryUserStore {
    /// Usuarios sembrados: alice y bob normales, admin con rol ADMIN
    pub fn seeded() -> Self {
        let user = |name: &str, roles: Vec<&str>| User {
            id: Uuid::new_v4(),
            username: name.to_string(),
            roles: roles.into_iter().map(String::from).collect(),
        };
        Self {
            users: vec![
                user("alice", vec![]),
                user("bob", vec![]),
                user("admin", vec![ADMIN_ROLE]),
            ],
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }
}

#[derive(Default)]
pub struct MemoryUserActionStore {
    entries: Mutex<Vec<UserAction>>,
}

impl MemoryUserActionStore {
    pub fn entries(&self) -> Vec<UserAction> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserActionStore for MemoryUserActionStore {
    async fn append(&self, action: UserAction) -> AppResult<()> {
        self.entries.lock().unwrap().push(action);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App de test
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub vehicles: Arc<MemoryVehicleStore>,
    pub coordinates: Arc<MemoryCoordinateStore>,
    pub actions: Arc<MemoryUserActionStore>,
}

pub fn build_test_app() -> TestApp {
    let config = EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration: 3600,
        cors_origins: vec![],
        import_artifact_dir: std::env::temp_dir()
            .join(format!("vehicle-imports-{}", Uuid::new_v4())),
    };

    let vehicles = Arc::new(MemoryVehicleStore::default());
    let coordinates = Arc::new(MemoryCoordinateStore::default());
    let users = Arc::new(MemoryUserStore::seeded());
    let actions = Arc::new(MemoryUserActionStore::default());

    let state = AppState::with_stores(
        config,
        vehicles.clone(),
        coordinates.clone(),
        users,
        actions.clone(),
    );
    let router = build_router(state.clone());

    TestApp {
        router,
        state,
        vehicles,
        coordinates,
        actions,
    }
}

pub fn token_for(username: &str) -> String {
    generate_token(username, &[], TEST_SECRET, 3600).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_raw(
        router,
        method,
        uri,
        token,
        body.map(|b| b.to_string().into_bytes()),
    )
    .await
}

pub async fn send_raw(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Vec<u8>>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(bytes) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(bytes))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Payload de vehículo válido con coordenadas dadas
pub fn vehicle_json(name: &str, x: i64, y: f64) -> Value {
    json!({
        "name": name,
        "x": x,
        "y": y,
        "type": "SHIP",
        "engine_power": 120.5,
        "number_of_wheels": 6,
        "capacity": 1000.0,
        "distance_travelled": 5000.0,
        "fuel_consumption": 35.0,
        "fuel_type": "DIESEL",
    })
}

/// Espera hasta que el estado de importación deje de ser PENDING
pub async fn wait_for_terminal_status(router: &Router, token: &str) -> Value {
    for _ in 0..200 {
        let (status, body) = send(
            router,
            "GET",
            "/api/vehicles/import/status",
            Some(token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] != "PENDING" && body["status"] != "NONE" {
            return body;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("la importación no terminó a tiempo");
}
