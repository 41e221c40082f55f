//! In-Memory Resource Repository Adapter
//!
//! Keeps resources in a map keyed by kind and id.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ResourceId};
use crate::domain::resource::{Resource, ResourceKind};
use crate::ports::ResourceRepository;

/// In-memory storage for resources
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceRepository {
    resources: Arc<RwLock<HashMap<(ResourceKind, ResourceId), Resource>>>,
}

impl InMemoryResourceRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with resources
    pub fn with_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
        let map = resources
            .into_iter()
            .map(|r| ((r.kind, r.id), r))
            .collect::<HashMap<_, _>>();
        Self {
            resources: Arc::new(RwLock::new(map)),
        }
    }

    /// Get the number of stored resources
    pub async fn count(&self) -> usize {
        self.resources.read().await.len()
    }
}

#[async_trait]
impl ResourceRepository for InMemoryResourceRepository {
    async fn save(&self, resource: &Resource) -> Result<(), DomainError> {
        let mut resources = self.resources.write().await;
        resources.insert((resource.kind, resource.id), resource.clone());
        Ok(())
    }

    async fn find(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> Result<Option<Resource>, DomainError> {
        let resources = self.resources.read().await;
        Ok(resources.get(&(kind, *id)).cloned())
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>, DomainError> {
        let resources = self.resources.read().await;
        let mut listed: Vec<Resource> = resources
            .values()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(listed)
    }

    async fn delete(&self, kind: ResourceKind, id: &ResourceId) -> Result<bool, DomainError> {
        let mut resources = self.resources.write().await;
        Ok(resources.remove(&(kind, *id)).is_some())
    }
}
