//! HTTP middleware for axum.
//!
//! Cross-cutting request handling, in the order the bootstrap installs it:
//!
//! - `locals` - template locals and per-request `host`/`url`
//! - `compression` - gzip for textual content
//! - `uploads` - refuses direct access to stored upload files
//! - `access_log` - one log line per request
//! - `method_override` - `X-HTTP-Method-Override` on POST
//! - `security_headers` - frame, sniffing and transport headers
//! - `session` - server-side sessions (tower-sessions) and flash messages
//! - `csrf` - anti-forgery tokens
//! - `auth` - signed-in user extractors
//! - `error_handler` - terminal handling of unhandled errors and panics

pub mod access_log;
pub mod auth;
pub mod compression;
pub mod csrf;
pub mod error_handler;
pub mod locals;
pub mod method_override;
pub mod security_headers;
pub mod session;
pub mod uploads;

pub use access_log::{access_log, AccessLogUser};
pub use auth::{AuthRejection, CurrentUser, RequireUser};
pub use compression::compression_layer;
pub use csrf::{csrf_protection, CsrfGuard, CsrfSetupError, CsrfToken};
pub use error_handler::{error_handler, panic_response, SERVER_ERROR_PATH};
pub use locals::{request_urls, RequestUrls, TemplateLocals};
pub use method_override::method_override;
pub use security_headers::{SecurityHeadersLayer, SECURITY_HEADERS};
pub use session::{
    load_session_user, sign_in, spawn_expired_session_sweeper, Flash, SessionSettings,
};
pub use uploads::{is_forbidden_upload, uploads_guard};
