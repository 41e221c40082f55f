//! RequestMembershipHandler - a signed-in user asks to join a resource.

use std::sync::Arc;

use crate::domain::foundation::AuthenticatedUser;
use crate::domain::resource::{
    Member, MembershipChange, MembershipEvent, Resource, ResourceError,
};
use crate::ports::{MembershipNotifier, ResourceRepository};

/// Command to submit a join request.
#[derive(Debug, Clone)]
pub struct RequestMembershipCommand {
    pub resource: Resource,
    pub requester: Option<AuthenticatedUser>,
}

/// Handler for join requests.
pub struct RequestMembershipHandler {
    repository: Arc<dyn ResourceRepository>,
    notifier: Arc<dyn MembershipNotifier>,
}

impl RequestMembershipHandler {
    pub fn new(
        repository: Arc<dyn ResourceRepository>,
        notifier: Arc<dyn MembershipNotifier>,
    ) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: RequestMembershipCommand) -> Result<Resource, ResourceError> {
        let requester = cmd.requester.ok_or(ResourceError::NotSignedIn)?;
        let mut resource = cmd.resource;

        // 1. Record the request (domain logic)
        resource.request_membership(Member::from(&requester))?;

        // 2. Persist
        self.repository.save(&resource).await?;

        // 3. Announce to the resource's room
        let event = MembershipEvent::new(
            resource.id,
            resource.kind,
            requester.id.clone(),
            MembershipChange::Requested,
        );
        self.notifier.notify(&event).await;

        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryResourceRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::resource::{ResourceDraft, ResourceKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<MembershipEvent>>,
    }

    #[async_trait]
    impl MembershipNotifier for RecordingNotifier {
        async fn notify(&self, event: &MembershipEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn user(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), format!("{id}@example.com"), None)
    }

    fn project() -> Resource {
        Resource::create(
            ResourceKind::Project,
            Member::from(&user("owner")),
            ResourceDraft {
                title: "Data portal".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn request_is_saved_and_announced() {
        let repo = Arc::new(InMemoryResourceRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let handler = RequestMembershipHandler::new(repo.clone(), notifier.clone());
        let project = project();

        let updated = handler
            .handle(RequestMembershipCommand {
                resource: project.clone(),
                requester: Some(user("dev")),
            })
            .await
            .unwrap();

        assert!(updated.has_pending_request(&UserId::new("dev").unwrap()));
        let stored = repo.find(ResourceKind::Project, &project.id).await.unwrap().unwrap();
        assert_eq!(stored.requests.len(), 1);

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].change, MembershipChange::Requested);
    }

    #[tokio::test]
    async fn anonymous_request_is_rejected_without_side_effects() {
        let repo = Arc::new(InMemoryResourceRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let handler = RequestMembershipHandler::new(repo.clone(), notifier.clone());

        let result = handler
            .handle(RequestMembershipCommand {
                resource: project(),
                requester: None,
            })
            .await;

        assert_eq!(result.unwrap_err(), ResourceError::NotSignedIn);
        assert_eq!(repo.count().await, 0);
        assert!(notifier.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn owner_request_conflicts() {
        let handler = RequestMembershipHandler::new(
            Arc::new(InMemoryResourceRepository::new()),
            Arc::new(RecordingNotifier::default()),
        );
        let result = handler
            .handle(RequestMembershipCommand {
                resource: project(),
                requester: Some(user("owner")),
            })
            .await;
        assert!(matches!(result, Err(ResourceError::AlreadyMember(_))));
    }
}
