//! Extractors for the signed-in user.
//!
//! The session layer injects the session's `AuthenticatedUser` into request
//! extensions; these extractors read it back.
//!
//! ```text
//! Request → load_session_user → injects AuthenticatedUser into extensions
//!                                          ↓
//!                                  Handler → CurrentUser / RequireUser
//! ```
//!
//! # Example
//!
//! ```ignore
//! async fn whoami(RequireUser(user): RequireUser) -> String {
//!     format!("Hello, {}!", user.display_name_or_email())
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// The signed-in user, or `None` for anonymous visitors.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthenticatedUser>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Extractor that requires a signed-in user. Anonymous requests get 401.
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthenticatedUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireUser)
            .ok_or(AuthRejection(AuthError::NotSignedIn))
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub struct AuthRejection(pub AuthError);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AuthError::NotSignedIn => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        };
        (
            status,
            Json(serde_json::json!({ "message": self.0.to_string() })),
        )
            .into_response()
    }
}
