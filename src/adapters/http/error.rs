//! Errors that escape their handler.
//!
//! Handlers never render infrastructure failures themselves. They answer with
//! an [`UnhandledError`], which travels as a response extension up to the
//! terminal error handler.

use std::backtrace::Backtrace;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// An error no handler could deal with.
#[derive(Debug, Clone)]
pub struct UnhandledError {
    pub message: String,
    /// Captured where the error was raised.
    pub backtrace: String,
}

impl UnhandledError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            backtrace: Backtrace::force_capture().to_string(),
        }
    }
}

impl std::fmt::Display for UnhandledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl IntoResponse for UnhandledError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_the_error() {
        let response = UnhandledError::new("pool exhausted").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let carried = response.extensions().get::<UnhandledError>().unwrap();
        assert_eq!(carried.message, "pool exhausted");
        assert!(!carried.backtrace.is_empty());
    }
}
