//! Policy gate middleware.
//!
//! Installed with `route_layer` on guarded routes only. The resource owner
//! passes; everyone else is checked against the family's role grants for the
//! matched route pattern and method. Denied requests never reach the handler.

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::authorization::{decide, AccessDecision, AccessRequest, Acl, Action};
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::domain::resource::ResourceKind;

use super::loader::LoadedResource;

#[derive(Clone)]
pub struct PolicyGate {
    pub kind: ResourceKind,
    pub acl: Arc<Acl>,
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": AuthError::InsufficientPermissions.to_string() })),
    )
        .into_response()
}

pub async fn policy_gate(
    State(gate): State<PolicyGate>,
    matched: MatchedPath,
    request: Request,
    next: Next,
) -> Response {
    let decision = match Action::from_method(request.method().as_str()) {
        Some(action) => decide(
            &gate.acl,
            AccessRequest {
                user: request.extensions().get::<AuthenticatedUser>(),
                resource: request.extensions().get::<LoadedResource>().map(|r| &r.0),
                route: matched.as_str(),
                action,
            },
        ),
        None => AccessDecision::Denied,
    };

    if decision.is_allowed() {
        return next.run(request).await;
    }

    tracing::debug!(
        kind = %gate.kind,
        route = matched.as_str(),
        method = %request.method(),
        user = request
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|u| u.id.to_string())
            .unwrap_or_else(|| "guest".to_string()),
        "Access denied"
    );
    forbidden()
}
