//! ListResourcesHandler - query for every resource of a family.

use std::sync::Arc;

use crate::domain::resource::{Resource, ResourceError, ResourceKind};
use crate::ports::ResourceRepository;

/// Query for all resources of one kind.
#[derive(Debug, Clone, Copy)]
pub struct ListResourcesQuery {
    pub kind: ResourceKind,
}

pub struct ListResourcesHandler {
    repository: Arc<dyn ResourceRepository>,
}

impl ListResourcesHandler {
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListResourcesQuery) -> Result<Vec<Resource>, ResourceError> {
        Ok(self.repository.list(query.kind).await?)
    }
}
