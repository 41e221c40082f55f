//! WebSocket upgrade handler for real-time membership updates.
//!
//! Connection lifecycle:
//! 1. Require a signed-in user (the session layer wraps this router)
//! 2. Resolve the resource the room belongs to
//! 3. Upgrade to WebSocket and join the resource room
//! 4. Forward room broadcasts and answer pings until disconnect
//! 5. Leave the room

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::{broadcast, mpsc};

use crate::adapters::http::middleware::CurrentUser;
use crate::domain::foundation::{AuthError, DomainError, ResourceId};
use crate::domain::resource::ResourceKind;
use crate::ports::ResourceRepository;

use super::messages::{ClientMessage, ConnectedMessage, PongMessage, ServerMessage};
use super::rooms::{ClientId, RoomManager};

/// Route of the real-time endpoint.
pub const REALTIME_PATH: &str = "/realtime/:id";

#[derive(Clone)]
pub struct RealtimeState {
    pub rooms: Arc<RoomManager>,
    pub resources: Arc<dyn ResourceRepository>,
}

impl RealtimeState {
    pub fn new(rooms: Arc<RoomManager>, resources: Arc<dyn ResourceRepository>) -> Self {
        Self { rooms, resources }
    }

    /// Rooms exist only for stored resources, whatever their kind.
    async fn resource_exists(&self, id: &ResourceId) -> Result<bool, DomainError> {
        for kind in ResourceKind::ALL {
            if self.resources.find(kind, id).await?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

/// `GET /realtime/:id`
pub async fn ws_handler(
    Path(resource_id): Path<String>,
    State(state): State<RealtimeState>,
    CurrentUser(user): CurrentUser,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let Ok(resource_id) = resource_id.parse::<ResourceId>() else {
        return json_error(StatusCode::BAD_REQUEST, "Invalid resource identifier");
    };
    let Some(user) = user else {
        return json_error(StatusCode::UNAUTHORIZED, AuthError::NotSignedIn.to_string());
    };

    match state.resource_exists(&resource_id).await {
        Ok(true) => {}
        Ok(false) => {
            return json_error(
                StatusCode::NOT_FOUND,
                "No resource with that identifier has been found",
            )
        }
        Err(e) => {
            tracing::error!(error = %e, resource_id = %resource_id, "Failed to resolve realtime room");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Resource unavailable");
        }
    }

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    tracing::debug!(user = %user.log_identity(), resource_id = %resource_id, "Realtime upgrade");
    ws.on_upgrade(move |socket| handle_socket(socket, resource_id, state))
}

async fn handle_socket(socket: WebSocket, resource_id: ResourceId, state: RealtimeState) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = ClientId::new();

    let mut room_rx = state.rooms.join(&resource_id, client_id).await;

    let connected = ServerMessage::Connected(ConnectedMessage {
        resource_id: resource_id.to_string(),
        client_id: client_id.to_string(),
        timestamp: super::messages::now_rfc3339(),
    });
    if let Err(e) = send_message(&mut sender, &connected).await {
        tracing::debug!(client_id = %client_id, "Failed to send connected message: {}", e);
        drop(room_rx);
        state.rooms.leave(&client_id).await;
        return;
    }

    // Replies produced by the receive loop go through the sender task.
    let (reply_tx, mut reply_rx) = mpsc::channel::<ServerMessage>(16);

    let mut send_task = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                event = room_rx.recv() => match event {
                    Ok(event) => ServerMessage::from(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(client_id = %client_id, skipped, "Client lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(reply) => reply,
                    None => break,
                },
            };
            if let Err(e) = send_message(&mut sender, &message).await {
                tracing::debug!(client_id = %client_id, "Send error, closing connection: {}", e);
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Ping) => {
                        if reply_tx
                            .send(ServerMessage::Pong(PongMessage::now()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(_) => {
                        tracing::trace!(client_id = %client_id, "Ignoring unknown client message");
                    }
                },
                Ok(Message::Binary(_)) => {
                    tracing::warn!(client_id = %client_id, "Received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(client_id = %client_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(client_id = %client_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    // The room receiver lives in the send task; wait for it to drop.
    let _ = send_task.await;

    state.rooms.leave(&client_id).await;
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(message).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Router exposing the real-time endpoint.
pub fn realtime_router(state: RealtimeState) -> Router {
    Router::new()
        .route(REALTIME_PATH, get(ws_handler))
        .with_state(state)
}
