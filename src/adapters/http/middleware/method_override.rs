//! HTTP method override for clients limited to GET and POST.
//!
//! A POST carrying `X-HTTP-Method-Override: PUT` is routed as a PUT. The
//! layer must wrap the router itself so the rewrite happens before routing.

use axum::{
    extract::Request,
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// The method a POST asks to be treated as, if any.
pub fn override_method(method: &Method, headers: &HeaderMap) -> Option<Method> {
    if method != Method::POST {
        return None;
    }
    let requested = headers.get(METHOD_OVERRIDE_HEADER)?.to_str().ok()?.trim();
    let requested = Method::from_bytes(requested.to_ascii_uppercase().as_bytes()).ok()?;
    match requested {
        Method::CONNECT | Method::TRACE => None,
        other => Some(other),
    }
}

pub async fn method_override(mut request: Request, next: Next) -> Response {
    if let Some(method) = override_method(request.method(), request.headers()) {
        tracing::trace!(from = %request.method(), to = %method, "Method override");
        *request.method_mut() = method;
    }
    next.run(request).await
}
