//! Resource repository port.
//!
//! Persists the resource aggregate for all four families. Every lookup is
//! scoped by [`ResourceKind`], so an org id never resolves on a program route.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ResourceId};
use crate::domain::resource::{Resource, ResourceKind};

/// Repository port for Resource aggregate persistence.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Insert or replace a resource, including its members and requests.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, resource: &Resource) -> Result<(), DomainError>;

    /// Find a resource of the given kind.
    ///
    /// Returns `None` if no resource of that kind has the id.
    async fn find(&self, kind: ResourceKind, id: &ResourceId)
        -> Result<Option<Resource>, DomainError>;

    /// All resources of a kind, ordered by title.
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>, DomainError>;

    /// Delete a resource.
    ///
    /// Returns `false` if nothing was deleted.
    async fn delete(&self, kind: ResourceKind, id: &ResourceId) -> Result<bool, DomainError>;
}
