//! Membership Notifier Port - announces membership changes to live clients.

use async_trait::async_trait;

use crate::domain::resource::MembershipEvent;

/// Port for announcing membership changes on a resource's channel.
///
/// Delivery is best effort: a notifier never fails the request that caused
/// the change.
#[async_trait]
pub trait MembershipNotifier: Send + Sync {
    async fn notify(&self, event: &MembershipEvent);
}

/// Notifier that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMembershipNotifier;

#[async_trait]
impl MembershipNotifier for NoopMembershipNotifier {
    async fn notify(&self, _event: &MembershipEvent) {}
}
