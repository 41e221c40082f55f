//! DeleteResourceHandler - removes an already-loaded resource.

use std::sync::Arc;

use crate::domain::resource::{Resource, ResourceError};
use crate::ports::ResourceRepository;

/// Command to delete a resource.
#[derive(Debug, Clone)]
pub struct DeleteResourceCommand {
    pub resource: Resource,
}

/// Handler for deleting resources.
pub struct DeleteResourceHandler {
    repository: Arc<dyn ResourceRepository>,
}

impl DeleteResourceHandler {
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self { repository }
    }

    /// Returns the deleted resource.
    ///
    /// A concurrent delete between load and this call surfaces as `NotFound`.
    pub async fn handle(&self, cmd: DeleteResourceCommand) -> Result<Resource, ResourceError> {
        let resource = cmd.resource;
        let removed = self.repository.delete(resource.kind, &resource.id).await?;
        if !removed {
            return Err(ResourceError::not_found(resource.kind, resource.id));
        }
        tracing::info!(kind = %resource.kind, resource_id = %resource.id, "Resource deleted");
        Ok(resource)
    }
}
