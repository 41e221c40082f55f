//! Server-side sessions on `tower-sessions`, keyed by a signed cookie.
//!
//! ```text
//! Request → SessionManagerLayer → loads the record named by the cookie
//!                 ↓
//!           load_session_user → AuthenticatedUser into extensions
//!                 ↓
//!           Handler → Session / CurrentUser / Flash extractors
//!                 ↓
//!           SessionManagerLayer → saves modified sessions, sets the cookie
//! ```
//!
//! A session is written only once something is stored in it, so anonymous
//! browsing leaves the store and the response cookies untouched.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    Router,
};
use sha2::{Digest, Sha512};
use tokio::task::JoinHandle;
use tower_sessions::{
    cookie::{time, Key, SameSite},
    session::{Error as SessionError, Id, Record},
    session_store::{self, ExpiredDeletion, SessionStore},
    Expiry, Session, SessionManagerLayer,
};

use crate::adapters::http::error::UnhandledError;
use crate::config::AppConfig;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::session::FlashMessages;

use super::access_log::AccessLogUser;

/// Session key of the signed-in user.
pub const USER_KEY: &str = "user";
/// Session key of the anti-forgery secret.
pub const CSRF_SECRET_KEY: &str = "csrf_secret";
/// Session key of pending flash messages.
pub const FLASH_KEY: &str = "flash";

/// Type-erased store behind the session layer.
#[derive(Debug, Clone)]
pub struct SessionBackend(Arc<dyn SessionStore>);

impl SessionBackend {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self(store)
    }
}

#[async_trait::async_trait]
impl SessionStore for SessionBackend {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        self.0.create(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.0.save(record).await
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        self.0.load(id).await
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.0.delete(id).await
    }
}

/// Derive the cookie signing key from the configured secret.
pub fn session_key(secret: &[u8]) -> Result<Key, String> {
    Key::try_from(Sha512::digest(secret).as_slice()).map_err(|e| e.to_string())
}

/// Cookie and store settings of the session layer, resolved from configuration.
#[derive(Clone)]
pub struct SessionSettings {
    store: SessionBackend,
    key: Key,
    cookie_name: String,
    http_only: bool,
    secure: bool,
    max_age: Option<Duration>,
}

impl SessionSettings {
    /// The cookie carries a max-age only in development or on the local
    /// domain; elsewhere it lasts for the browser session. `Secure` needs TLS.
    pub fn new(config: &AppConfig, store: Arc<dyn SessionStore>) -> Result<Self, String> {
        Ok(Self {
            store: SessionBackend::new(store),
            key: session_key(config.session.secret_bytes())?,
            cookie_name: config.session.key.clone(),
            http_only: config.session.http_only,
            secure: config.secure_session_cookie(),
            max_age: config
                .persistent_session_cookie()
                .then(|| config.session.max_age()),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    fn expiry(&self) -> Expiry {
        match self.max_age {
            Some(max_age) => Expiry::OnInactivity(time::Duration::seconds(
                i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX),
            )),
            None => Expiry::OnSessionEnd,
        }
    }

    /// Wrap `router` in the session layer and [`load_session_user`].
    pub fn wrap(&self, router: Router) -> Router {
        router.layer(from_fn(load_session_user)).layer(
            SessionManagerLayer::new(self.store.clone())
                .with_name(self.cookie_name.clone())
                .with_http_only(self.http_only)
                .with_secure(self.secure)
                .with_same_site(SameSite::Lax)
                .with_expiry(self.expiry())
                .with_signed(self.key.clone()),
        )
    }
}

/// Attach the session's user to the request and report it to the access log.
pub async fn load_session_user(session: Session, mut request: Request, next: Next) -> Response {
    let user = match session.get::<AuthenticatedUser>(USER_KEY).await {
        Ok(user) => user,
        Err(e) => {
            return UnhandledError::new(format!("Failed to load session: {}", e)).into_response()
        }
    };
    if let Some(user) = &user {
        request.extensions_mut().insert(user.clone());
    }

    let mut response = next.run(request).await;
    response
        .extensions_mut()
        .insert(AccessLogUser(user.map(|u| u.log_identity())));
    response
}

/// Store `user` as the signed-in user under a fresh session id.
pub async fn sign_in(session: &Session, user: &AuthenticatedUser) -> Result<(), SessionError> {
    session.cycle_id().await?;
    session.insert(USER_KEY, user).await
}

/// Delete expired records from `store` every `period`.
pub fn spawn_expired_session_sweeper<S>(store: S, period: Duration) -> JoinHandle<()>
where
    S: ExpiredDeletion + Clone,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            match store.delete_expired().await {
                Ok(()) => tracing::debug!("Expired sessions removed"),
                Err(e) => tracing::warn!(error = %e, "Failed to remove expired sessions"),
            }
        }
    })
}

/// One-shot messages carried to the next page.
#[derive(Clone)]
pub struct Flash(Session);

impl Flash {
    pub async fn push(&self, kind: &str, message: impl Into<String>) -> Result<(), SessionError> {
        let mut flash = self
            .0
            .get::<FlashMessages>(FLASH_KEY)
            .await?
            .unwrap_or_default();
        flash.push(kind, message);
        self.0.insert(FLASH_KEY, flash).await
    }

    /// Take every pending message. The session is modified only when some
    /// were pending.
    pub async fn take_all(&self) -> Result<BTreeMap<String, Vec<String>>, SessionError> {
        let Some(mut flash) = self.0.get::<FlashMessages>(FLASH_KEY).await? else {
            return Ok(BTreeMap::new());
        };
        self.0.remove::<FlashMessages>(FLASH_KEY).await?;
        Ok(flash.take_all())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = UnhandledError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state)
            .await
            .map(Flash)
            .map_err(|_| UnhandledError::new("Session layer is not installed"))
    }
}
