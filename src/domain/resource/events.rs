//! Membership change events broadcast to resource rooms.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ResourceId, Timestamp, UserId};

use super::ResourceKind;

/// What happened to a user's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    Requested,
    Confirmed,
    Denied,
}

/// A membership change on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipEvent {
    pub resource_id: ResourceId,
    pub kind: ResourceKind,
    pub user_id: UserId,
    pub change: MembershipChange,
    pub occurred_at: Timestamp,
}

impl MembershipEvent {
    pub fn new(
        resource_id: ResourceId,
        kind: ResourceKind,
        user_id: UserId,
        change: MembershipChange,
    ) -> Self {
        Self {
            resource_id,
            kind,
            user_id,
            change,
            occurred_at: Timestamp::now(),
        }
    }
}
