//! CreateResourceHandler - creates a resource owned by the signed-in user.

use std::sync::Arc;

use crate::domain::foundation::AuthenticatedUser;
use crate::domain::resource::{Member, Resource, ResourceDraft, ResourceError, ResourceKind};
use crate::ports::ResourceRepository;

/// Command to create a resource.
#[derive(Debug, Clone)]
pub struct CreateResourceCommand {
    pub kind: ResourceKind,
    pub creator: Option<AuthenticatedUser>,
    pub draft: ResourceDraft,
}

/// Handler for creating resources.
pub struct CreateResourceHandler {
    repository: Arc<dyn ResourceRepository>,
}

impl CreateResourceHandler {
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateResourceCommand) -> Result<Resource, ResourceError> {
        let creator = cmd.creator.ok_or(ResourceError::NotSignedIn)?;
        let resource = Resource::create(cmd.kind, Member::from(&creator), cmd.draft)?;
        self.repository.save(&resource).await?;

        tracing::info!(
            kind = %resource.kind,
            resource_id = %resource.id,
            owner = %creator.id,
            "Resource created"
        );
        Ok(resource)
    }
}
