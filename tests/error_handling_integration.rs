//! Integration tests for terminal error handling.
//!
//! Panics and infrastructure failures must be logged with a backtrace and
//! answered with a redirect to the server error page.

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::{routing::get, Router};
use serde_json::json;

use common::{config_for, fixture_root, TestApp};
use devex_server::adapters::http::AppState;
use devex_server::adapters::storage::InMemorySessionStore;
use devex_server::bootstrap::{
    build_app, default_modules, BootstrapError, Dependencies, ModuleRoutes, ServerModule,
};
use devex_server::domain::foundation::{DomainError, ErrorCode, ResourceId};
use devex_server::domain::resource::{Resource, ResourceKind};
use devex_server::ports::ResourceRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

struct Exploding;

async fn boom() -> &'static str {
    panic!("kaboom")
}

#[async_trait]
impl ServerModule for Exploding {
    fn name(&self) -> &'static str {
        "exploding"
    }

    fn routes(&self, _state: &AppState) -> Result<ModuleRoutes, BootstrapError> {
        Ok(ModuleRoutes::new(
            vec!["/boom".to_string()],
            Router::new().route("/boom", get(boom)),
        ))
    }
}

/// Repository whose every call fails.
struct BrokenRepository;

fn unavailable() -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, "connection refused")
}

#[async_trait]
impl ResourceRepository for BrokenRepository {
    async fn save(&self, _resource: &Resource) -> Result<(), DomainError> {
        Err(unavailable())
    }

    async fn find(
        &self,
        _kind: ResourceKind,
        _id: &ResourceId,
    ) -> Result<Option<Resource>, DomainError> {
        Err(unavailable())
    }

    async fn list(&self, _kind: ResourceKind) -> Result<Vec<Resource>, DomainError> {
        Err(unavailable())
    }

    async fn delete(&self, _kind: ResourceKind, _id: &ResourceId) -> Result<bool, DomainError> {
        Err(unavailable())
    }
}

async fn broken_app() -> (Router, tempfile::TempDir) {
    let root = fixture_root();
    let deps = Dependencies {
        resources: Arc::new(BrokenRepository),
        session_store: Arc::new(InMemorySessionStore::new()),
        database: None,
        modules: default_modules(),
    };
    let router = build_app(config_for(root.path()), deps).await.unwrap();
    (router, root)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn panic_redirects_to_server_error_and_is_logged() {
    let (logs, _guard) = capture_logs();
    let mut modules = default_modules();
    modules.insert(0, Box::new(Exploding));
    let app = TestApp::spawn_with(|_| {}, modules).await.unwrap();

    let response = app.get("/boom", None).await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.header("location"), Some("/server-error"));
    let logged = logs.contents();
    assert!(logged.contains("Unhandled error"), "{logged}");
    assert!(logged.contains("kaboom"), "{logged}");
    assert!(logged.contains("backtrace"), "{logged}");
}

#[tokio::test]
async fn repository_failure_redirects_to_server_error() {
    let (logs, _guard) = capture_logs();
    let (router, _root) = broken_app().await;

    let response = tower::ServiceExt::oneshot(
        router,
        common::request("GET", "/api/programs", None, None),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/server-error"
    );
    assert!(logs.contents().contains("connection refused"));
}

#[tokio::test]
async fn loader_failure_redirects_to_server_error() {
    let (router, _root) = broken_app().await;

    let response = tower::ServiceExt::oneshot(
        router,
        common::request(
            "GET",
            &format!("/api/orgs/{}", ResourceId::new()),
            None,
            None,
        ),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn successful_responses_pass_through_untouched() {
    let (logs, _guard) = capture_logs();
    let app = TestApp::spawn().await;

    let response = app.get("/api/programs", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
    assert!(logs.contents().is_empty());
}

#[tokio::test]
async fn server_error_page_renders_with_500() {
    let app = TestApp::spawn().await;

    let response = app.get("/server-error", None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "<h1>Oops! Something went wrong...</h1>");
}

#[tokio::test]
async fn unknown_api_path_is_404() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/unknown/thing", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "error": "Path not found" }));
}
