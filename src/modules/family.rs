//! Server module wrapping one resource family.

use async_trait::async_trait;

use crate::adapters::http::resources::RouteTable;
use crate::adapters::http::AppState;
use crate::bootstrap::{BootstrapError, ModuleRoutes, ServerModule};
use crate::domain::authorization::ResourcePolicy;

/// Rows under this prefix submit join requests and are dropped when the
/// feature is off.
pub const JOIN_REQUEST_PREFIX: &str = "/api/request/";

pub struct ResourceFamily<P> {
    name: &'static str,
    policy: P,
    table: fn() -> RouteTable,
}

impl<P: ResourcePolicy> ResourceFamily<P> {
    pub fn new(name: &'static str, policy: P, table: fn() -> RouteTable) -> Self {
        Self {
            name,
            policy,
            table,
        }
    }

    /// The family's route table after feature filtering.
    pub fn route_table(&self, state: &AppState) -> RouteTable {
        let table = (self.table)();
        if state.config.features.enable_join_requests {
            table
        } else {
            table.without_prefix(JOIN_REQUEST_PREFIX)
        }
    }
}

#[async_trait]
impl<P: ResourcePolicy + 'static> ServerModule for ResourceFamily<P> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn policy(&self) -> Option<&dyn ResourcePolicy> {
        Some(&self.policy)
    }

    fn routes(&self, state: &AppState) -> Result<ModuleRoutes, BootstrapError> {
        let table = self.route_table(state);
        let paths = table.paths();
        Ok(ModuleRoutes::new(paths, table.into_router(state)))
    }
}
