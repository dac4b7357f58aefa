//! Broadcaster de notificaciones
//!
//! Fan-out fire-and-forget sobre dos topics: cambios en la tabla de
//! vehículos y cambios en los estados de importación. Sin confirmación de
//! entrega ni reintentos; el orden dentro de un topic sigue el orden de
//! publicación porque las publicaciones ocurren dentro de la sección
//! crítica que produjo el cambio. Nunca se publica una mutación fallida.

use tokio::sync::broadcast;

/// Topic de cambios en la tabla de vehículos
pub const TABLE_UPDATES_TOPIC: &str = "table-updates";

/// Topic de cambios en los estados de importación
pub const IMPORT_STATUS_TOPIC: &str = "import-status";

const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct UpdateBroadcaster {
    table: broadcast::Sender<String>,
    import_status: broadcast::Sender<String>,
}

impl UpdateBroadcaster {
    pub fn new() -> Self {
        let (table, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (import_status, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            table,
            import_status,
        }
    }

    /// Publica "la tabla cambió" a todos los suscriptores actuales.
    /// Sin suscriptores no es un error.
    pub fn publish_table_update(&self) {
        let payload = r#"{"message": "Datos de la tabla actualizados"}"#.to_string();
        let _ = self.table.send(payload);
    }

    /// Publica "los estados de importación cambiaron"
    pub fn publish_import_status(&self) {
        let payload = r#"{"message": "Estados de importación actualizados"}"#.to_string();
        let _ = self.import_status.send(payload);
    }

    pub fn subscribe_table(&self) -> broadcast::Receiver<String> {
        self.table.subscribe()
    }

    pub fn subscribe_import_status(&self) -> broadcast::Receiver<String> {
        self.import_status.subscribe()
    }
}

impl Default for UpdateBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
