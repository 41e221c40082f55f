//! Per-family route tables.
//!
//! Each row is explicitly guarded or open. Rows carrying `:id` get the
//! loader; guarded rows get the policy gate. The loader is the outer
//! `route_layer`, so it runs first and the gate sees the loaded resource.

use axum::{middleware::from_fn_with_state, routing::MethodRouter, Router};

use crate::adapters::http::state::AppState;
use crate::domain::resource::ResourceKind;

use super::gate::{policy_gate, PolicyGate};
use super::handlers::FamilyState;
use super::loader::{load_resource, ResourceLoader, ID_PARAM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Guarded,
    Open,
}

struct RouteRow {
    path: &'static str,
    gate: Gate,
    methods: MethodRouter<FamilyState>,
}

impl RouteRow {
    fn has_id_param(&self) -> bool {
        self.path
            .split('/')
            .any(|segment| segment.strip_prefix(':') == Some(ID_PARAM))
    }
}

/// Ordered route rows for one resource family.
pub struct RouteTable {
    kind: ResourceKind,
    rows: Vec<RouteRow>,
}

impl RouteTable {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Adds a row checked by the family policy.
    pub fn guarded(mut self, path: &'static str, methods: MethodRouter<FamilyState>) -> Self {
        self.rows.push(RouteRow {
            path,
            gate: Gate::Guarded,
            methods,
        });
        self
    }

    /// Adds a row reachable without a policy check.
    pub fn open(mut self, path: &'static str, methods: MethodRouter<FamilyState>) -> Self {
        self.rows.push(RouteRow {
            path,
            gate: Gate::Open,
            methods,
        });
        self
    }

    /// Drops every row whose path starts with `prefix`.
    pub fn without_prefix(mut self, prefix: &str) -> Self {
        self.rows.retain(|row| !row.path.starts_with(prefix));
        self
    }

    pub fn paths(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.path.to_string()).collect()
    }

    pub fn gate_of(&self, path: &str) -> Option<Gate> {
        self.rows.iter().find(|row| row.path == path).map(|row| row.gate)
    }

    pub fn into_router(self, state: &AppState) -> Router {
        let family = FamilyState {
            app: state.clone(),
            kind: self.kind,
        };
        let gate = PolicyGate {
            kind: self.kind,
            acl: state.acl.clone(),
        };
        let loader = ResourceLoader {
            kind: self.kind,
            resources: state.resources.clone(),
        };

        self.rows.into_iter().fold(Router::new(), |router, row| {
            let has_id = row.has_id_param();
            let mut route = Router::new().route(row.path, row.methods);
            if row.gate == Gate::Guarded {
                route = route.route_layer(from_fn_with_state(gate.clone(), policy_gate));
            }
            if has_id {
                route = route.route_layer(from_fn_with_state(loader.clone(), load_resource));
            }
            router.merge(route.with_state(family.clone()))
        })
    }
}
