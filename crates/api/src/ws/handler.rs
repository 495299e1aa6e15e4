use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use booksummary_events::{ClientMessage, ServerMessage, Topic};
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::manager::WsManager;

/// GET /api/v1/ws
///
/// Upgrades to a WebSocket. The connection receives nothing until it
/// subscribes to at least one topic.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Manage a single WebSocket connection after upgrade.
///
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Handles subscribe/unsubscribe frames on the current task.
///   4. Removes the connection and its subscriptions on disconnect.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                let reply = handle_client_frame(&ws_manager, &conn_id, text.as_str()).await;
                send_frame(&ws_manager, &conn_id, &reply).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Apply one client frame and build the reply.
async fn handle_client_frame(ws_manager: &WsManager, conn_id: &str, text: &str) -> ServerMessage {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(m) => m,
        Err(e) => {
            return ServerMessage::Error {
                message: format!("Invalid message: {e}"),
            }
        }
    };

    match message {
        ClientMessage::Subscribe { topic } => {
            if let Err(e) = topic.parse::<Topic>() {
                return ServerMessage::Error {
                    message: e.to_string(),
                };
            }
            ws_manager.subscribe(conn_id, &topic).await;
            tracing::debug!(conn_id, topic = %topic, "Subscribed");
            ServerMessage::Subscribed { topic }
        }
        ClientMessage::Unsubscribe { topic } => {
            ws_manager.unsubscribe(conn_id, &topic).await;
            tracing::debug!(conn_id, topic = %topic, "Unsubscribed");
            ServerMessage::Unsubscribed { topic }
        }
    }
}

async fn send_frame(ws_manager: &WsManager, conn_id: &str, frame: &ServerMessage) {
    match serde_json::to_string(frame) {
        Ok(json) => {
            ws_manager.send_to(conn_id, Message::Text(json.into())).await;
        }
        Err(e) => tracing::error!(error = %e, "Failed to serialize WebSocket frame"),
    }
}
