//! UpdateResourceHandler - applies a patch to an already-loaded resource.

use std::sync::Arc;

use crate::domain::resource::{Resource, ResourceError, ResourcePatch};
use crate::ports::ResourceRepository;

/// Command to update a resource.
#[derive(Debug, Clone)]
pub struct UpdateResourceCommand {
    /// Resource resolved by the route-parameter loader.
    pub resource: Resource,
    pub patch: ResourcePatch,
}

/// Handler for updating resources.
pub struct UpdateResourceHandler {
    repository: Arc<dyn ResourceRepository>,
}

impl UpdateResourceHandler {
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateResourceCommand) -> Result<Resource, ResourceError> {
        let mut resource = cmd.resource;
        resource.apply_patch(cmd.patch)?;
        self.repository.save(&resource).await?;
        Ok(resource)
    }
}
