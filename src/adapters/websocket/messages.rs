//! WebSocket message types for real-time membership updates.
//!
//! - Server → Client: connection status, membership updates, errors, pongs
//! - Client → Server: pings

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::resource::{MembershipChange, MembershipEvent, ResourceKind};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established and room joined.
    Connected(ConnectedMessage),

    /// Someone requested to join, or was confirmed or denied.
    #[serde(rename = "membership.update")]
    MembershipUpdate(MembershipUpdateMessage),

    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Sent when a client joins a resource room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub resource_id: String,
    pub client_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipUpdateMessage {
    pub resource_id: String,
    pub kind: ResourceKind,
    pub user_id: String,
    pub change: MembershipChange,
    pub timestamp: String,
}

impl From<MembershipEvent> for MembershipUpdateMessage {
    fn from(event: MembershipEvent) -> Self {
        Self {
            resource_id: event.resource_id.to_string(),
            kind: event.kind,
            user_id: event.user_id.to_string(),
            change: event.change,
            timestamp: event.occurred_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorMessage {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: now_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

impl PongMessage {
    pub fn now() -> Self {
        Self {
            timestamp: now_rfc3339(),
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,
}

impl From<MembershipEvent> for ServerMessage {
    fn from(event: MembershipEvent) -> Self {
        ServerMessage::MembershipUpdate(event.into())
    }
}

pub(crate) fn now_rfc3339() -> String {
    Timestamp::now().as_datetime().to_rfc3339()
}
