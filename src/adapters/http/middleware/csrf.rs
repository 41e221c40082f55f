//! Anti-forgery protection, installed directly inside the session layer when
//! enabled.
//!
//! Each session holds a random secret; the token is its HMAC-SHA256 under
//! the session secret, hex encoded. The token is exposed in a readable
//! cookie, and unsafe methods must echo it in the configured header.

use axum::{
    extract::{Request, State},
    http::{header::InvalidHeaderName, HeaderName, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tower_sessions::Session;

use crate::adapters::http::error::UnhandledError;
use crate::config::CsrfConfig;

use super::session::CSRF_SECRET_KEY;

type HmacSha256 = Hmac<Sha256>;

/// The current request's token, for views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(pub String);

#[derive(Debug, Error)]
pub enum CsrfSetupError {
    #[error("invalid CSRF header name: {0}")]
    Header(#[from] InvalidHeaderName),

    #[error("invalid CSRF signing key")]
    Key(#[from] hmac::digest::InvalidLength),
}

#[derive(Clone)]
pub struct CsrfGuard {
    header: HeaderName,
    cookie: String,
    mac: HmacSha256,
}

impl CsrfGuard {
    pub fn new(config: &CsrfConfig, secret: &[u8]) -> Result<Self, CsrfSetupError> {
        Ok(Self {
            header: HeaderName::from_bytes(config.header.to_ascii_lowercase().as_bytes())?,
            cookie: config.cookie.clone(),
            mac: HmacSha256::new_from_slice(secret)?,
        })
    }

    fn signature(&self, secret: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(secret.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    pub fn token_for(&self, secret: &str) -> String {
        hex::encode(self.signature(secret))
    }

    pub fn verify(&self, secret: &str, provided: &str) -> bool {
        let Ok(provided) = hex::decode(provided) else {
            return false;
        };
        let expected = self.signature(secret);
        expected.len() == provided.len() && expected.ct_eq(&provided).into()
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

async fn ensure_secret(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(secret) = session.get::<String>(CSRF_SECRET_KEY).await? {
        return Ok(secret);
    }
    let secret = uuid::Uuid::new_v4().simple().to_string();
    session.insert(CSRF_SECRET_KEY, &secret).await?;
    Ok(secret)
}

pub async fn csrf_protection(
    State(guard): State<CsrfGuard>,
    session: Session,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let secret = match ensure_secret(&session).await {
        Ok(secret) => secret,
        Err(e) => {
            return UnhandledError::new(format!("Failed to load CSRF secret: {}", e))
                .into_response()
        }
    };

    if !is_safe(request.method()) {
        let valid = request
            .headers()
            .get(&guard.header)
            .and_then(|v| v.to_str().ok())
            .map(|provided| guard.verify(&secret, provided))
            .unwrap_or(false);
        if !valid {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request with missing or invalid CSRF token"
            );
            return (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({ "message": "Invalid CSRF token" })),
            )
                .into_response();
        }
    }

    let token = guard.token_for(&secret);
    request.extensions_mut().insert(CsrfToken(token.clone()));

    let response = next.run(request).await;
    if jar.get(&guard.cookie).map(|c| c.value()) == Some(token.as_str()) {
        return response;
    }
    let jar = jar.add(Cookie::build((guard.cookie.clone(), token)).path("/"));
    (jar, response).into_response()
}
