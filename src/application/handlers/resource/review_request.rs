//! ReviewRequestHandler - confirms or denies a pending join request.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::resource::{
    Member, MembershipChange, MembershipEvent, Resource, ResourceError,
};
use crate::ports::{MembershipNotifier, ResourceRepository};

/// Outcome chosen by the resource administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Confirm,
    Deny,
}

/// Command to review a join request.
#[derive(Debug, Clone)]
pub struct ReviewRequestCommand {
    pub resource: Resource,
    pub user_id: UserId,
    pub decision: ReviewDecision,
}

/// Result of a review.
#[derive(Debug, Clone)]
pub struct ReviewRequestResult {
    pub resource: Resource,
    pub member: Member,
}

/// Handler for confirming and denying join requests.
pub struct ReviewRequestHandler {
    repository: Arc<dyn ResourceRepository>,
    notifier: Arc<dyn MembershipNotifier>,
}

impl ReviewRequestHandler {
    pub fn new(
        repository: Arc<dyn ResourceRepository>,
        notifier: Arc<dyn MembershipNotifier>,
    ) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReviewRequestCommand,
    ) -> Result<ReviewRequestResult, ResourceError> {
        let mut resource = cmd.resource;

        let (member, change) = match cmd.decision {
            ReviewDecision::Confirm => (
                resource.confirm_member(&cmd.user_id)?,
                MembershipChange::Confirmed,
            ),
            ReviewDecision::Deny => (resource.deny_member(&cmd.user_id)?, MembershipChange::Denied),
        };

        self.repository.save(&resource).await?;

        let event = MembershipEvent::new(resource.id, resource.kind, cmd.user_id, change);
        self.notifier.notify(&event).await;

        Ok(ReviewRequestResult { resource, member })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryResourceRepository;
    use crate::domain::resource::{ResourceDraft, ResourceKind};
    use crate::ports::NoopMembershipNotifier;

    fn org_with_request() -> Resource {
        let mut org = Resource::create(
            ResourceKind::Org,
            Member::new(UserId::new("owner").unwrap(), "Owner", "owner@example.com"),
            ResourceDraft {
                title: "Acme".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        org.request_membership(Member::new(
            UserId::new("dev").unwrap(),
            "Dev",
            "dev@example.com",
        ))
        .unwrap();
        org
    }

    fn handler(repo: Arc<InMemoryResourceRepository>) -> ReviewRequestHandler {
        ReviewRequestHandler::new(repo, Arc::new(NoopMembershipNotifier))
    }

    #[tokio::test]
    async fn confirm_adds_member() {
        let repo = Arc::new(InMemoryResourceRepository::new());
        let result = handler(repo.clone())
            .handle(ReviewRequestCommand {
                resource: org_with_request(),
                user_id: UserId::new("dev").unwrap(),
                decision: ReviewDecision::Confirm,
            })
            .await
            .unwrap();

        assert_eq!(result.member.display_name, "Dev");
        assert_eq!(result.resource.members.len(), 2);
        assert!(result.resource.requests.is_empty());
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn deny_drops_request() {
        let repo = Arc::new(InMemoryResourceRepository::new());
        let result = handler(repo)
            .handle(ReviewRequestCommand {
                resource: org_with_request(),
                user_id: UserId::new("dev").unwrap(),
                decision: ReviewDecision::Deny,
            })
            .await
            .unwrap();

        assert_eq!(result.resource.members.len(), 1);
        assert!(result.resource.requests.is_empty());
    }

    #[tokio::test]
    async fn unknown_user_has_no_pending_request() {
        let repo = Arc::new(InMemoryResourceRepository::new());
        let result = handler(repo.clone())
            .handle(ReviewRequestCommand {
                resource: org_with_request(),
                user_id: UserId::new("stranger").unwrap(),
                decision: ReviewDecision::Confirm,
            })
            .await;

        assert!(matches!(result, Err(ResourceError::NoPendingRequest(_))));
        assert_eq!(repo.count().await, 0);
    }
}
