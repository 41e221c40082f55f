//! Core module: layout page, error pages and the catch-all.
//!
//! Registered last. Any GET outside the API renders the `index` layout so
//! client-side routing can take over; unknown `/api`, `/modules` and `/lib`
//! paths are real 404s.

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Map, Value};

use crate::adapters::http::middleware::{CsrfToken, CurrentUser, Flash, RequestUrls, SERVER_ERROR_PATH};
use crate::adapters::http::{AppState, UnhandledError};
use crate::bootstrap::{BootstrapError, ModuleRoutes, ServerModule};

/// Views the module refuses to start without.
pub const REQUIRED_VIEWS: [&str; 3] = ["index", "404", "500"];

const NOT_FOUND_PREFIXES: [&str; 3] = ["/api", "/modules", "/lib"];

const NOT_FOUND_MESSAGE: &str = "Path not found";

pub struct CoreModule;

#[async_trait]
impl ServerModule for CoreModule {
    fn name(&self) -> &'static str {
        "core"
    }

    async fn configure(&self, state: &AppState) -> Result<(), BootstrapError> {
        for view in REQUIRED_VIEWS {
            if !state.views.exists(view).await {
                return Err(BootstrapError::module(
                    self.name(),
                    format!("required view '{view}' is missing"),
                ));
            }
        }
        Ok(())
    }

    fn routes(&self, state: &AppState) -> Result<ModuleRoutes, BootstrapError> {
        let router = Router::new()
            .route(SERVER_ERROR_PATH, get(server_error))
            .fallback(fallback)
            .with_state(state.clone());
        Ok(ModuleRoutes::new(vec![SERVER_ERROR_PATH.to_string()], router).with_fallback())
    }
}

/// Render `name` with the template locals merged with `extra`.
async fn render_view(
    state: &AppState,
    name: &str,
    status: StatusCode,
    extra: Map<String, Value>,
) -> Result<Response, UnhandledError> {
    let mut locals = match serde_json::to_value(state.locals.as_ref()) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => return Err(UnhandledError::new(format!("Failed to encode locals: {e}"))),
    };
    locals.extend(extra);

    let html = state
        .views
        .render(name, &Value::Object(locals))
        .await
        .map_err(|e| UnhandledError::new(format!("Failed to render view {name}: {e}")))?;
    Ok((status, Html(html)).into_response())
}

/// `GET /server-error`
async fn server_error(State(state): State<AppState>) -> Response {
    let mut extra = Map::new();
    extra.insert(
        "error".to_string(),
        Value::from("Oops! Something went wrong..."),
    );
    match render_view(&state, "500", StatusCode::INTERNAL_SERVER_ERROR, extra).await {
        Ok(response) => response,
        // Not an UnhandledError: that would redirect back here.
        Err(e) => {
            tracing::error!(error = %e, "Failed to render server error page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn is_reserved_path(path: &str) -> bool {
    NOT_FOUND_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .map(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(false)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotFoundFormat {
    Html,
    Json,
    Text,
}

fn negotiate(headers: &HeaderMap) -> NotFoundFormat {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if accept.is_empty() || accept.contains("text/html") || accept.contains("*/*") {
        NotFoundFormat::Html
    } else if accept.contains("json") {
        NotFoundFormat::Json
    } else {
        NotFoundFormat::Text
    }
}

async fn not_found(state: &AppState, headers: &HeaderMap) -> Response {
    match negotiate(headers) {
        NotFoundFormat::Html => render_view(state, "404", StatusCode::NOT_FOUND, Map::new())
            .await
            .unwrap_or_else(IntoResponse::into_response),
        NotFoundFormat::Json => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": NOT_FOUND_MESSAGE })),
        )
            .into_response(),
        NotFoundFormat::Text => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    CurrentUser(user): CurrentUser,
    urls: Option<Extension<RequestUrls>>,
    csrf: Option<Extension<CsrfToken>>,
    flash: Option<Flash>,
) -> Response {
    if method != Method::GET || is_reserved_path(uri.path()) {
        return not_found(&state, &headers).await;
    }

    let urls = urls
        .map(|Extension(urls)| urls)
        .unwrap_or_else(|| RequestUrls::resolve(&headers, &uri));
    let flash = match flash {
        Some(flash) => match flash.take_all().await {
            Ok(flash) => flash,
            Err(e) => {
                return UnhandledError::new(format!("Failed to read flash messages: {}", e))
                    .into_response()
            }
        },
        None => Default::default(),
    };

    let mut extra = Map::new();
    extra.insert("host".to_string(), Value::from(urls.host));
    extra.insert("url".to_string(), Value::from(urls.url));
    extra.insert(
        "user".to_string(),
        serde_json::to_value(&user).unwrap_or(Value::Null),
    );
    extra.insert(
        "flash".to_string(),
        serde_json::to_value(flash).unwrap_or(Value::Null),
    );
    if let Some(Extension(CsrfToken(token))) = csrf {
        extra.insert("csrfToken".to_string(), Value::from(token));
    }

    render_view(&state, "index", StatusCode::OK, extra)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}
