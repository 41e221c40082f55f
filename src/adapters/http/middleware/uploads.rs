//! Uploads access filter.
//!
//! Stored upload files are named `file-…`; any path below the uploads prefix
//! containing `file-` anywhere is refused. The match is a plain substring
//! test over the whole path.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

pub const FORBIDDEN_MARKER: &str = "file-";

pub const FORBIDDEN_BODY: &str = "<h1>403 Forbidden</h1>";

/// True when `path` lies below `prefix` and contains [`FORBIDDEN_MARKER`].
pub fn is_forbidden_upload(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    let below_prefix = path
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|rest| !rest.is_empty())
        .unwrap_or(false);
    below_prefix && path.contains(FORBIDDEN_MARKER)
}

pub async fn uploads_guard(
    State(prefix): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    if is_forbidden_upload(&prefix, request.uri().path()) {
        tracing::debug!(path = %request.uri().path(), "Refusing direct upload access");
        return (StatusCode::FORBIDDEN, Html(FORBIDDEN_BODY)).into_response();
    }
    next.run(request).await
}
