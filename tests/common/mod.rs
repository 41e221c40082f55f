//! Shared harness for the router integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Path as UrlPath, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::Session;

use devex_server::adapters::http::middleware::sign_in;
use devex_server::adapters::http::AppState;
use devex_server::adapters::storage::{InMemoryResourceRepository, InMemorySessionStore};
use devex_server::bootstrap::{
    build_app, default_modules, BootstrapError, Dependencies, ModuleRoutes, ServerModule,
};
use devex_server::config::AppConfig;
use devex_server::domain::foundation::{AuthenticatedUser, Role, UserId};

pub const SIGN_IN_PATH: &str = "/test/sign-in/:id";

type PendingSignIns = Arc<Mutex<HashMap<String, AuthenticatedUser>>>;

/// Signs in whichever user the harness registered under the path's id,
/// the way an account module would after checking credentials.
struct SignInModule {
    pending: PendingSignIns,
}

async fn sign_in_pending(
    State(pending): State<PendingSignIns>,
    UrlPath(id): UrlPath<String>,
    session: Session,
) -> StatusCode {
    let user = pending.lock().unwrap().remove(&id);
    match user {
        Some(user) => {
            sign_in(&session, &user).await.unwrap();
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

#[async_trait]
impl ServerModule for SignInModule {
    fn name(&self) -> &'static str {
        "test-sign-in"
    }

    fn routes(&self, _state: &AppState) -> Result<ModuleRoutes, BootstrapError> {
        Ok(ModuleRoutes::new(
            vec![SIGN_IN_PATH.to_string()],
            Router::new()
                .route(SIGN_IN_PATH, get(sign_in_pending))
                .with_state(self.pending.clone()),
        ))
    }
}

/// Views, public assets and favicon under a temporary root.
pub fn fixture_root() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let views = root.path().join("views");
    let public = root.path().join("public");
    std::fs::create_dir_all(&views).unwrap();
    std::fs::create_dir_all(&public).unwrap();

    std::fs::write(
        views.join("index.server.view.html"),
        "<title>{{ title }}</title><main data-url=\"{{ url }}\">{{ user.email }}</main>",
    )
    .unwrap();
    std::fs::write(views.join("404.server.view.html"), "<h1>Page Not Found</h1>").unwrap();
    std::fs::write(views.join("500.server.view.html"), "<h1>{{ error }}</h1>").unwrap();
    std::fs::write(public.join("app.css"), "body { color: #003366; }").unwrap();
    std::fs::write(public.join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();
    root
}

/// Default configuration pointed at the fixture root.
pub fn config_for(root: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.assets.public_dir = root.join("public");
    config.assets.views_dir = root.join("views");
    config.app.favicon = root.join("public/favicon.ico").display().to_string();
    config
}

pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
    pub resources: Arc<InMemoryResourceRepository>,
    pub sessions: Arc<InMemorySessionStore>,
    pending: PendingSignIns,
    _root: Option<TempDir>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect()
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let root = fixture_root();
        let config = config_for(root.path());
        Self::build(config, default_modules(), Some(root))
            .await
            .unwrap()
    }

    pub async fn spawn_with(
        configure: impl FnOnce(&mut AppConfig),
        modules: Vec<Box<dyn ServerModule>>,
    ) -> Result<Self, BootstrapError> {
        let root = fixture_root();
        let mut config = config_for(root.path());
        configure(&mut config);
        Self::build(config, modules, Some(root)).await
    }

    pub async fn build(
        config: AppConfig,
        mut modules: Vec<Box<dyn ServerModule>>,
        root: Option<TempDir>,
    ) -> Result<Self, BootstrapError> {
        let resources = Arc::new(InMemoryResourceRepository::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let pending = PendingSignIns::default();
        modules.push(Box::new(SignInModule {
            pending: pending.clone(),
        }));
        let deps = Dependencies {
            resources: resources.clone(),
            session_store: sessions.clone(),
            database: None,
            modules,
        };
        let router = build_app(config.clone(), deps).await?;
        Ok(Self {
            router,
            config,
            resources,
            sessions,
            pending,
            _root: root,
        })
    }

    /// Sign `user` in through the session layer and return the response
    /// carrying the session cookie.
    pub async fn sign_in_response(&self, user: &AuthenticatedUser) -> TestResponse {
        let id = user.id.to_string();
        self.pending.lock().unwrap().insert(id.clone(), user.clone());
        let response = self.get(&format!("/test/sign-in/{id}"), None).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT, "sign-in failed");
        response
    }

    /// Sign `user` in and return the `Cookie` header value.
    pub async fn sign_in(&self, user: &AuthenticatedUser) -> String {
        let response = self.sign_in_response(user).await;
        let prefix = format!("{}=", self.config.session.key);
        response
            .set_cookies()
            .into_iter()
            .find(|cookie| cookie.starts_with(&prefix))
            .and_then(|cookie| cookie.split(';').next().map(str::to_string))
            .expect("sign-in sets the session cookie")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(request("GET", uri, cookie, None)).await
    }
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>, json: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ACCEPT, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match json {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(id).unwrap(),
        format!("{id}@example.com"),
        Some(id.to_uppercase()),
    )
}

pub fn admin(id: &str) -> AuthenticatedUser {
    user(id).with_roles([Role::Admin])
}

pub fn gov(id: &str) -> AuthenticatedUser {
    user(id).with_roles([Role::Gov])
}
