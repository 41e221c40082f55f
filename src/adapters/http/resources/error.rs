//! HTTP mapping of resource errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::adapters::http::error::UnhandledError;
use crate::domain::resource::ResourceError;

/// API error wrapper for resource handlers.
#[derive(Debug)]
pub struct ResourceApiError(pub ResourceError);

impl From<ResourceError> for ResourceApiError {
    fn from(err: ResourceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ResourceApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ResourceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ResourceError::NotSignedIn => StatusCode::UNAUTHORIZED,
            ResourceError::AlreadyMember(_) | ResourceError::AlreadyRequested(_) => {
                StatusCode::CONFLICT
            }
            ResourceError::NoPendingRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ResourceError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ResourceError::Infrastructure(message) => {
                return UnhandledError::new(message.clone()).into_response();
            }
        };

        let body = match &self.0 {
            ResourceError::ValidationFailed { field, .. } => json!({
                "message": self.0.message(),
                "code": self.0.code().to_string(),
                "field": field,
            }),
            _ => json!({
                "message": self.0.message(),
                "code": self.0.code().to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
