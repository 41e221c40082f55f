//! WebSocket room management keyed by resource.
//!
//! Every resource (program, org, project, opportunity) has at most one room.
//! Clients watching a resource join its room and receive the membership
//! changes announced for it.
//!
//! ```text
//! Room: org-1          Room: program-7
//! ├── client-a         ├── client-d
//! ├── client-b         └── client-e
//! └── client-c
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::domain::foundation::ResourceId;
use crate::domain::resource::MembershipEvent;
use crate::ports::MembershipNotifier;

/// Unique identifier for a WebSocket client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Manages WebSocket rooms, one broadcast channel per watched resource.
///
/// Broadcasts (reads) vastly outnumber joins and leaves, so the registry
/// sits behind a `RwLock`.
pub struct RoomManager {
    rooms: RwLock<HashMap<ResourceId, broadcast::Sender<MembershipEvent>>>,

    /// client → room, for cleanup on disconnect.
    client_rooms: RwLock<HashMap<ClientId, ResourceId>>,

    channel_capacity: usize,
}

impl RoomManager {
    /// Create a room manager whose rooms buffer `channel_capacity` events.
    /// Slow clients miss the oldest events once the buffer is full.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            client_rooms: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Create with default capacity (128 events).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Join a client to a resource room, creating the room on first use.
    pub async fn join(
        &self,
        resource_id: &ResourceId,
        client_id: ClientId,
    ) -> broadcast::Receiver<MembershipEvent> {
        let mut rooms = self.rooms.write().await;
        let sender = rooms.entry(*resource_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });

        self.client_rooms
            .write()
            .await
            .insert(client_id, *resource_id);

        sender.subscribe()
    }

    /// Remove a client from its room. The room is dropped once no receiver
    /// remains, so callers drop their receiver first.
    pub async fn leave(&self, client_id: &ClientId) {
        let Some(resource_id) = self.client_rooms.write().await.remove(client_id) else {
            return;
        };

        let mut rooms = self.rooms.write().await;
        let empty = rooms
            .get(&resource_id)
            .map(|sender| sender.receiver_count() == 0)
            .unwrap_or(false);
        if empty {
            rooms.remove(&resource_id);
        }
    }

    /// Send an event to every client in the event's resource room.
    /// No room means nobody is watching; the event is dropped.
    pub async fn broadcast(&self, event: MembershipEvent) {
        let rooms = self.rooms.read().await;
        if let Some(sender) = rooms.get(&event.resource_id) {
            // no receivers is fine
            let _ = sender.send(event);
        }
    }

    /// Connected clients in one room.
    pub async fn client_count(&self, resource_id: &ResourceId) -> usize {
        self.rooms
            .read()
            .await
            .get(resource_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    pub async fn active_rooms(&self) -> Vec<ResourceId> {
        self.rooms.read().await.keys().cloned().collect()
    }

    pub async fn total_client_count(&self) -> usize {
        self.client_rooms.read().await.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl MembershipNotifier for RoomManager {
    async fn notify(&self, event: &MembershipEvent) {
        tracing::debug!(
            resource_id = %event.resource_id,
            user_id = %event.user_id,
            change = ?event.change,
            "Broadcasting membership change"
        );
        self.broadcast(event.clone()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::resource::{MembershipChange, ResourceKind};
    use std::sync::Arc;

    fn event_for(resource_id: ResourceId) -> MembershipEvent {
        MembershipEvent::new(
            resource_id,
            ResourceKind::Org,
            UserId::new("dev-1").unwrap(),
            MembershipChange::Requested,
        )
    }

    #[tokio::test]
    async fn join_creates_room_if_not_exists() {
        let manager = RoomManager::with_default_capacity();
        let resource_id = ResourceId::new();

        let _rx = manager.join(&resource_id, ClientId::new()).await;

        assert_eq!(manager.active_rooms().await, vec![resource_id]);
        assert_eq!(manager.client_count(&resource_id).await, 1);
    }

    #[tokio::test]
    async fn members_of_a_room_all_receive_broadcast() {
        let manager = Arc::new(RoomManager::with_default_capacity());
        let resource_id = ResourceId::new();

        let mut rx1 = manager.join(&resource_id, ClientId::new()).await;
        let mut rx2 = manager.join(&resource_id, ClientId::new()).await;

        manager.broadcast(event_for(resource_id)).await;

        assert_eq!(rx1.recv().await.unwrap().resource_id, resource_id);
        assert_eq!(rx2.recv().await.unwrap().resource_id, resource_id);
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let manager = RoomManager::with_default_capacity();
        let watched = ResourceId::new();
        let other = ResourceId::new();

        let mut rx = manager.join(&watched, ClientId::new()).await;
        let _other_rx = manager.join(&other, ClientId::new()).await;

        manager.broadcast(event_for(other)).await;

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn leave_cleans_up_empty_room() {
        let manager = RoomManager::with_default_capacity();
        let resource_id = ResourceId::new();
        let client = ClientId::new();

        let rx = manager.join(&resource_id, client).await;
        drop(rx);
        manager.leave(&client).await;

        assert!(manager.active_rooms().await.is_empty());
        assert_eq!(manager.total_client_count().await, 0);
    }

    #[tokio::test]
    async fn leave_keeps_room_with_remaining_clients() {
        let manager = RoomManager::with_default_capacity();
        let resource_id = ResourceId::new();
        let leaving = ClientId::new();

        let rx = manager.join(&resource_id, leaving).await;
        let _stay = manager.join(&resource_id, ClientId::new()).await;
        drop(rx);
        manager.leave(&leaving).await;

        assert_eq!(manager.client_count(&resource_id).await, 1);
    }

    #[tokio::test]
    async fn broadcast_without_room_is_noop() {
        let manager = RoomManager::with_default_capacity();
        manager.broadcast(event_for(ResourceId::new())).await;
        assert!(manager.active_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn notifier_delivers_to_room() {
        let manager = Arc::new(RoomManager::with_default_capacity());
        let resource_id = ResourceId::new();
        let mut rx = manager.join(&resource_id, ClientId::new()).await;

        let notifier: Arc<dyn MembershipNotifier> = manager.clone();
        notifier.notify(&event_for(resource_id)).await;

        assert_eq!(rx.recv().await.unwrap().change, MembershipChange::Requested);
    }
}
