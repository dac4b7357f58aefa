//! Suscripción WebSocket a las notificaciones
//!
//! Cada conexión recibe los dos topics envueltos en un sobre
//! `{"topic": .., "payload": ..}`. Entrega best-effort: un suscriptor
//! rezagado pierde los mensajes que el canal ya descartó.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use crate::services::update_broadcaster::{
    UpdateBroadcaster, IMPORT_STATUS_TOPIC, TABLE_UPDATES_TOPIC,
};
use crate::state::AppState;

pub async fn updates_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let broadcaster = state.broadcaster.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

fn envelope(topic: &str, payload: String) -> String {
    // El payload ya es JSON; si no parsea se reenvía como string opaco
    let payload = serde_json::from_str::<serde_json::Value>(&payload)
        .unwrap_or(serde_json::Value::String(payload));
    json!({ "topic": topic, "payload": payload }).to_string()
}

async fn handle_socket(mut socket: WebSocket, broadcaster: UpdateBroadcaster) {
    let mut table = broadcaster.subscribe_table();
    let mut import_status = broadcaster.subscribe_import_status();

    loop {
        tokio::select! {
            update = table.recv() => match update {
                Ok(payload) => {
                    let message = envelope(TABLE_UPDATES_TOPIC, payload);
                    if socket.send(Message::Text(message)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("Suscriptor rezagado, {} mensajes descartados", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            update = import_status.recv() => match update {
                Ok(payload) => {
                    let message = envelope(IMPORT_STATUS_TOPIC, payload);
                    if socket.send(Message::Text(message)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("Suscriptor rezagado, {} mensajes descartados", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                // El cliente cerró la conexión
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => {}
            },
        }
    }
}
