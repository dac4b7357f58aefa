//! Registry de estados de importación
//!
//! Exactamente un registro vivo por usuario: cada intento nuevo
//! sobreescribe al anterior (last-write-wins, sin cola por usuario).
//! Las lecturas no requieren el lock de mutaciones; las escrituras de
//! SUCCESS/ERROR ocurren dentro de la sección crítica del import.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::import_status::ImportStatus;

#[derive(Clone, Default)]
pub struct ImportRegistry {
    inner: Arc<RwLock<HashMap<String, ImportStatus>>>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sobreescribe incondicionalmente el registro del usuario
    pub async fn set(&self, username: &str, status: ImportStatus) {
        log::info!(
            "Estado de importación de '{}' -> {:?}",
            username,
            status.status
        );
        let mut records = self.inner.write().await;
        records.insert(username.to_string(), status);
    }

    /// Último estado registrado, o None si el usuario nunca importó
    pub async fn get(&self, username: &str) -> Option<ImportStatus> {
        let records = self.inner.read().await;
        records.get(username).cloned()
    }

    /// El artefacto solo se entrega si pertenece al último intento
    /// del propio usuario
    pub async fn owns_artifact(&self, username: &str, filename: &str) -> bool {
        let records = self.inner.read().await;
        records
            .get(username)
            .and_then(|s| s.artifact.as_deref())
            .map(|a| a == filename)
            .unwrap_or(false)
    }
}
