//! Server module contract.

use async_trait::async_trait;
use axum::Router;

use crate::adapters::http::AppState;
use crate::domain::authorization::ResourcePolicy;

use super::error::BootstrapError;

/// Routes contributed by one module.
pub struct ModuleRoutes {
    /// Route patterns, checked for duplicates across modules.
    pub paths: Vec<String>,
    /// Whether the router carries a fallback. At most one module may.
    pub has_fallback: bool,
    pub router: Router,
}

impl ModuleRoutes {
    pub fn new(paths: Vec<String>, router: Router) -> Self {
        Self {
            paths,
            has_fallback: false,
            router,
        }
    }

    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }
}

/// A unit of server functionality registered at startup.
///
/// Hooks are invoked by the bootstrap in three passes over the registry:
/// every `configure`, then every `policy`, then every `routes`.
#[async_trait]
pub trait ServerModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Module configuration with access to the server state and database.
    async fn configure(&self, _state: &AppState) -> Result<(), BootstrapError> {
        Ok(())
    }

    /// ACL policy registered before any route is mounted.
    fn policy(&self) -> Option<&dyn ResourcePolicy> {
        None
    }

    fn routes(&self, state: &AppState) -> Result<ModuleRoutes, BootstrapError>;
}
