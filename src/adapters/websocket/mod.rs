//! WebSocket adapters for real-time membership updates.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │            RequestMembership / ReviewRequest handlers                │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ MembershipNotifier::notify
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RoomManager                                     │
//! │   Room: org-123        Room: project-456    Room: program-789       │
//! │   ├── client-a         ├── client-d         └── client-g            │
//! │   └── client-b         └── client-e                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`rooms`] - Per-resource rooms
//! - [`handler`] - Axum upgrade handler at `/realtime/:id`

pub mod handler;
pub mod messages;
pub mod rooms;

pub use handler::{realtime_router, ws_handler, RealtimeState, REALTIME_PATH};
pub use messages::{
    ClientMessage, ConnectedMessage, ErrorMessage, MembershipUpdateMessage, PongMessage,
    ServerMessage,
};
pub use rooms::{ClientId, RoomManager};
