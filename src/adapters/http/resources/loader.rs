//! Route-parameter loader for `:id`.
//!
//! Runs before the policy gate and the handler on every route carrying an
//! `:id` segment. The resource is fetched once and attached to the request as
//! [`LoadedResource`]; handlers read it from there and never fetch again.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, FromRequestParts, Path, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::adapters::http::error::UnhandledError;
use crate::domain::foundation::ResourceId;
use crate::domain::resource::{Resource, ResourceKind};
use crate::ports::ResourceRepository;

/// Name of the route parameter the loader resolves.
pub const ID_PARAM: &str = "id";

/// The resource named by the route's `:id`.
#[derive(Debug, Clone)]
pub struct LoadedResource(pub Resource);

#[derive(Clone)]
pub struct ResourceLoader {
    pub kind: ResourceKind,
    pub resources: Arc<dyn ResourceRepository>,
}

impl ResourceLoader {
    fn not_found(&self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": self.kind.not_found_message() })),
        )
            .into_response()
    }
}

/// An `:id` that cannot be decoded names no resource, so it answers 404
/// like any other unknown identifier.
pub async fn load_resource(
    State(loader): State<ResourceLoader>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    let Ok(Path(params)) = params else {
        return loader.not_found();
    };
    let Some(raw) = params.get(ID_PARAM) else {
        return next.run(request).await;
    };
    let Ok(id) = raw.parse::<ResourceId>() else {
        return loader.not_found();
    };

    match loader.resources.find(loader.kind, &id).await {
        Ok(Some(resource)) => {
            request.extensions_mut().insert(LoadedResource(resource));
            next.run(request).await
        }
        Ok(None) => loader.not_found(),
        Err(e) => UnhandledError::new(format!(
            "Failed to load {} {}: {}",
            loader.kind.singular(),
            id,
            e
        ))
        .into_response(),
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for LoadedResource
where
    S: Send + Sync,
{
    type Rejection = UnhandledError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<LoadedResource>()
            .cloned()
            .ok_or_else(|| UnhandledError::new("Route has no resource loader"))
    }
}
