//! Terminal error handling.
//!
//! The only place unhandled failures are reported. Infrastructure errors
//! arrive as [`UnhandledError`] response extensions; panics are turned into
//! the same shape by [`panic_response`] under `CatchPanicLayer`. Both are
//! logged with their backtrace and answered with a redirect to
//! [`SERVER_ERROR_PATH`]. Every other response passes through untouched.

use std::any::Any;

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::UnhandledError;

/// Page rendered after an unhandled error.
pub const SERVER_ERROR_PATH: &str = "/server-error";

pub async fn error_handler(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(error) = response.extensions().get::<UnhandledError>() else {
        return response;
    };

    tracing::error!(
        method = %method,
        path = %path,
        error = %error.message,
        backtrace = %error.backtrace,
        "Unhandled error"
    );
    redirect_to_server_error()
}

fn redirect_to_server_error() -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, HeaderValue::from_static(SERVER_ERROR_PATH))],
    )
        .into_response()
}

/// `CatchPanicLayer` callback.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    UnhandledError::new(format!("Handler panicked: {detail}")).into_response()
}
