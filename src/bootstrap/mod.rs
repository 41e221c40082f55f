//! Application bootstrap.
//!
//! Builds the server router in a fixed sequence. Each stage is a method on
//! `Bootstrap<Stage>` consuming the previous stage, so stages cannot be
//! skipped or reordered:
//!
//! ```text
//! Bootstrap<Init>
//!   .template_locals()        → Locals
//!   .middleware()             → Middleware
//!   .view_engine()            → Views
//!   .security_headers()       → Secured
//!   .static_assets()?         → Static
//!   .sessions()?              → Sessions
//!   .configure_modules()?     → Configured
//!   .policies()               → Policed
//!   .routes()?                → Routed
//!   .error_handler()          → Guarded
//!   .realtime()               → Router
//! ```
//!
//! Request flow through the assembled router, outermost first:
//!
//! ```text
//! request_urls → compression → uploads_guard → favicon
//!   → access_log → body limit → method_override → security headers
//!   → { static assets | error_handler → session → session user
//!                       → csrf → catch panic → module routes }
//! ```

mod error;
mod module;
mod registry;

pub use error::BootstrapError;
pub use module::{ModuleRoutes, ServerModule};
pub use registry::default_modules;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use sqlx::PgPool;
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
};
use tower_sessions::SessionStore;

use crate::adapters::http::middleware::{
    access_log, compression_layer, csrf_protection, error_handler, method_override,
    panic_response, request_urls, uploads_guard, CsrfGuard, SecurityHeadersLayer,
    SessionSettings, TemplateLocals,
};
use crate::adapters::http::AppState;
use crate::adapters::storage::{InMemoryResourceRepository, InMemorySessionStore};
use crate::adapters::views::FileViewEngine;
use crate::adapters::websocket::{realtime_router, RealtimeState};
use crate::config::{AccessLogFormat, AppConfig, STATIC_MAX_AGE_MS};
use crate::ports::{ResourceRepository, ViewEngine};

/// Adapters and modules the server is built from.
pub struct Dependencies {
    pub resources: Arc<dyn ResourceRepository>,
    pub session_store: Arc<dyn SessionStore>,
    pub database: Option<PgPool>,
    pub modules: Vec<Box<dyn ServerModule>>,
}

impl Dependencies {
    /// In-memory adapters with the default module registry.
    pub fn in_memory() -> Self {
        Self {
            resources: Arc::new(InMemoryResourceRepository::new()),
            session_store: Arc::new(InMemorySessionStore::new()),
            database: None,
            modules: default_modules(),
        }
    }

    pub fn with_modules(mut self, modules: Vec<Box<dyn ServerModule>>) -> Self {
        self.modules = modules;
        self
    }
}

/// Build the complete router.
pub async fn build_app(config: AppConfig, deps: Dependencies) -> Result<Router, BootstrapError> {
    Ok(Bootstrap::new(config, deps)
        .template_locals()
        .middleware()
        .view_engine()
        .security_headers()
        .static_assets()?
        .sessions()?
        .configure_modules()
        .await?
        .policies()
        .routes()?
        .error_handler()
        .realtime())
}

pub struct Bootstrap<S> {
    config: Arc<AppConfig>,
    deps: Dependencies,
    stage: S,
}

impl<S> Bootstrap<S> {
    fn advance<T>(self, stage: T) -> Bootstrap<T> {
        Bootstrap {
            config: self.config,
            deps: self.deps,
            stage,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Stages
// ════════════════════════════════════════════════════════════════════════════════

pub struct Init;

pub struct Locals {
    locals: Arc<TemplateLocals>,
}

/// Settings of the global middleware chain, resolved from configuration.
#[derive(Debug, Clone)]
pub struct MiddlewareChain {
    pub access_log: Option<AccessLogFormat>,
    pub body_limit: usize,
    pub uploads_prefix: Arc<str>,
    pub favicon: PathBuf,
    pub view_cache: bool,
}

pub struct Middleware {
    locals: Arc<TemplateLocals>,
    chain: MiddlewareChain,
}

pub struct Views {
    locals: Arc<TemplateLocals>,
    chain: MiddlewareChain,
    views: Arc<dyn ViewEngine>,
}

pub struct Secured {
    inner: Views,
    headers: SecurityHeadersLayer,
}

pub struct Static {
    inner: Views,
    headers: SecurityHeadersLayer,
    assets: Router,
}

pub struct Sessions {
    inner: Views,
    headers: SecurityHeadersLayer,
    assets: Router,
    sessions: SessionSettings,
    csrf: Option<CsrfGuard>,
}

pub struct Configured {
    chain: MiddlewareChain,
    headers: SecurityHeadersLayer,
    assets: Router,
    csrf: Option<CsrfGuard>,
    state: AppState,
}

pub struct Policed {
    chain: MiddlewareChain,
    headers: SecurityHeadersLayer,
    assets: Router,
    csrf: Option<CsrfGuard>,
    state: AppState,
}

pub struct Routed {
    chain: MiddlewareChain,
    headers: SecurityHeadersLayer,
    assets: Router,
    csrf: Option<CsrfGuard>,
    state: AppState,
    routes: Router,
}

pub struct Guarded {
    state: AppState,
    app: Router,
}

impl Bootstrap<Init> {
    pub fn new(config: AppConfig, deps: Dependencies) -> Self {
        Self {
            config: Arc::new(config),
            deps,
            stage: Init,
        }
    }

    pub fn template_locals(self) -> Bootstrap<Locals> {
        let locals = Arc::new(TemplateLocals::from_config(&self.config));
        tracing::debug!(title = %self.config.app.title, "Template locals ready");
        self.advance(Locals { locals })
    }
}

impl Bootstrap<Locals> {
    pub fn middleware(self) -> Bootstrap<Middleware> {
        let chain = MiddlewareChain {
            access_log: self.config.log.format,
            body_limit: self.config.assets.body_limit,
            uploads_prefix: Arc::from(self.config.assets.uploads_prefix.as_str()),
            favicon: PathBuf::from(&self.config.app.favicon),
            view_cache: self.config.view_cache_enabled(),
        };
        tracing::debug!(
            access_log = ?chain.access_log,
            view_cache = chain.view_cache,
            "Middleware chain configured"
        );
        let locals = self.stage.locals.clone();
        self.advance(Middleware { locals, chain })
    }

    pub fn locals(&self) -> &TemplateLocals {
        &self.stage.locals
    }
}

impl Bootstrap<Middleware> {
    pub fn view_engine(self) -> Bootstrap<Views> {
        let Bootstrap { config, deps, stage } = self;
        let views: Arc<dyn ViewEngine> = Arc::new(FileViewEngine::new(
            config.assets.views_dir.clone(),
            stage.chain.view_cache,
        ));
        tracing::debug!(root = %config.assets.views_dir.display(), "View engine ready");
        Bootstrap {
            config,
            deps,
            stage: Views {
                locals: stage.locals,
                chain: stage.chain,
                views,
            },
        }
    }

    pub fn chain(&self) -> &MiddlewareChain {
        &self.stage.chain
    }
}

impl Bootstrap<Views> {
    /// Build the layer stamping security headers on every site response.
    pub fn security_headers(self) -> Bootstrap<Secured> {
        let headers = SecurityHeadersLayer::new();
        tracing::debug!(count = headers.headers().len(), "Security headers ready");
        let Bootstrap { config, deps, stage } = self;
        Bootstrap {
            config,
            deps,
            stage: Secured {
                inner: stage,
                headers,
            },
        }
    }
}

impl Bootstrap<Secured> {
    pub fn security_headers_layer(&self) -> &SecurityHeadersLayer {
        &self.stage.headers
    }

    /// Mount `/public` and each configured folder with a one-day max-age.
    pub fn static_assets(self) -> Result<Bootstrap<Static>, BootstrapError> {
        let assets = &self.config.assets;
        let mut mounts = vec![("/public".to_string(), assets.public_dir.clone())];
        mounts.extend(assets.static_folders.iter().map(|folder| {
            let folder = folder.trim_matches('/');
            (format!("/{folder}"), assets.folders_root.join(folder))
        }));

        let cache_control = HeaderValue::from_str(&format!(
            "public, max-age={}",
            STATIC_MAX_AGE_MS / 1000
        ))
        .map_err(|e| BootstrapError::module("static", e.to_string()))?;

        let mut router = Router::new();
        for (mount, dir) in mounts {
            if !dir.is_dir() {
                return Err(BootstrapError::StaticDirMissing(dir));
            }
            tracing::debug!(mount = %mount, dir = %dir.display(), "Serving static assets");
            router = router.nest_service(
                &mount,
                SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, cache_control.clone())
                    .layer(ServeDir::new(dir)),
            );
        }

        let Bootstrap { config, deps, stage } = self;
        Ok(Bootstrap {
            config,
            deps,
            stage: Static {
                inner: stage.inner,
                headers: stage.headers,
                assets: router,
            },
        })
    }
}

impl Bootstrap<Static> {
    pub fn sessions(self) -> Result<Bootstrap<Sessions>, BootstrapError> {
        if self.config.session.uses_default_secret() {
            tracing::warn!("Session secret is the development default");
        }
        let sessions = SessionSettings::new(&self.config, self.deps.session_store.clone())
            .map_err(BootstrapError::SessionSecret)?;

        let csrf_config = &self.config.security.csrf;
        let csrf = if csrf_config.enabled {
            Some(
                CsrfGuard::new(csrf_config, self.config.session.secret_bytes())
                    .map_err(|_| BootstrapError::CsrfHeader(csrf_config.header.clone()))?,
            )
        } else {
            None
        };
        tracing::debug!(
            cookie = sessions.cookie_name(),
            persistent = sessions.max_age().is_some(),
            csrf = csrf.is_some(),
            "Sessions configured"
        );

        let Bootstrap { config, deps, stage } = self;
        Ok(Bootstrap {
            config,
            deps,
            stage: Sessions {
                inner: stage.inner,
                headers: stage.headers,
                assets: stage.assets,
                sessions,
                csrf,
            },
        })
    }
}

impl Bootstrap<Sessions> {
    /// Run every module's configuration hook. The first failure aborts.
    pub async fn configure_modules(self) -> Result<Bootstrap<Configured>, BootstrapError> {
        let Sessions {
            inner,
            headers,
            assets,
            sessions,
            csrf,
        } = self.stage;
        let state = AppState::new(
            self.config.clone(),
            inner.locals,
            self.deps.resources.clone(),
            inner.views,
            sessions,
            self.deps.database.clone(),
        );

        for module in &self.deps.modules {
            module.configure(&state).await?;
            tracing::debug!(module = module.name(), "Module configured");
        }

        Ok(Bootstrap {
            config: self.config,
            deps: self.deps,
            stage: Configured {
                chain: inner.chain,
                headers,
                assets,
                csrf,
                state,
            },
        })
    }
}

impl Bootstrap<Configured> {
    pub fn policies(self) -> Bootstrap<Policed> {
        for module in &self.deps.modules {
            if let Some(policy) = module.policy() {
                policy.invoke_roles_policies(&self.stage.state.acl);
                tracing::debug!(module = module.name(), kind = %policy.kind(), "Policy registered");
            }
        }
        let Configured {
            chain,
            headers,
            assets,
            csrf,
            state,
        } = self.stage;
        Bootstrap {
            config: self.config,
            deps: self.deps,
            stage: Policed {
                chain,
                headers,
                assets,
                csrf,
                state,
            },
        }
    }

    pub fn state(&self) -> &AppState {
        &self.stage.state
    }
}

impl Bootstrap<Policed> {
    /// Mount every module's routes in registry order.
    pub fn routes(self) -> Result<Bootstrap<Routed>, BootstrapError> {
        let mut owners: HashMap<String, &'static str> = HashMap::new();
        let mut fallback_owner: Option<&'static str> = None;
        let mut routes = Router::new();

        for module in &self.deps.modules {
            let name = module.name();
            let contributed = module.routes(&self.stage.state)?;

            for path in contributed.paths {
                if let Some(first) = owners.insert(path.clone(), name) {
                    return Err(BootstrapError::DuplicateRoute {
                        path,
                        first,
                        second: name,
                    });
                }
            }
            if contributed.has_fallback {
                if let Some(first) = fallback_owner {
                    return Err(BootstrapError::DuplicateFallback {
                        first,
                        second: name,
                    });
                }
                fallback_owner = Some(name);
            }

            routes = routes.merge(contributed.router);
            tracing::debug!(module = name, "Routes mounted");
        }

        let Policed {
            chain,
            headers,
            assets,
            csrf,
            state,
        } = self.stage;
        Ok(Bootstrap {
            config: self.config,
            deps: self.deps,
            stage: Routed {
                chain,
                headers,
                assets,
                csrf,
                state,
                routes,
            },
        })
    }

    pub fn state(&self) -> &AppState {
        &self.stage.state
    }
}

impl Bootstrap<Routed> {
    /// Install terminal error handling and assemble the middleware chain.
    pub fn error_handler(self) -> Bootstrap<Guarded> {
        let Routed {
            chain,
            headers,
            assets,
            csrf,
            state,
            routes,
        } = self.stage;

        let mut dynamic = routes.layer(CatchPanicLayer::custom(panic_response));
        if let Some(csrf) = csrf {
            dynamic = dynamic.layer(from_fn_with_state(csrf, csrf_protection));
        }
        let dynamic = state.sessions.wrap(dynamic).layer(from_fn(error_handler));

        let site = dynamic.merge(assets).layer(headers);
        let overridden = from_fn(method_override).layer(site);

        let mut logged = Router::new()
            .fallback_service(overridden)
            .layer(DefaultBodyLimit::max(chain.body_limit));
        if let Some(format) = chain.access_log {
            logged = logged.layer(from_fn_with_state(format, access_log));
        }

        let app = Router::new()
            .route_service("/favicon.ico", ServeFile::new(&chain.favicon))
            .fallback_service(logged)
            .layer(from_fn_with_state(chain.uploads_prefix.clone(), uploads_guard))
            .layer(compression_layer())
            .layer(from_fn(request_urls));

        Bootstrap {
            config: self.config,
            deps: self.deps,
            stage: Guarded { state, app },
        }
    }
}

impl Bootstrap<Guarded> {
    /// Attach the real-time transport and return the finished router.
    pub fn realtime(self) -> Router {
        let Guarded { state, app } = self.stage;
        if !self.config.features.enable_realtime {
            return app;
        }
        let realtime = state.sessions.wrap(realtime_router(RealtimeState::new(
            state.rooms.clone(),
            state.resources.clone(),
        )));
        tracing::debug!("Real-time transport attached");
        realtime.merge(app)
    }

    pub fn state(&self) -> &AppState {
        &self.stage.state
    }
}
