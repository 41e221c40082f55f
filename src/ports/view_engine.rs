//! View Engine Port - renders named server-side templates.

use async_trait::async_trait;
use serde_json::Value;

/// Errors raised while rendering a view
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("View not found: {0}")]
    NotFound(String),

    #[error("Failed to read view {name}: {reason}")]
    Io { name: String, reason: String },
}

/// Port for rendering `{name}.server.view.html` templates
#[async_trait]
pub trait ViewEngine: Send + Sync {
    /// Render a view with the given locals.
    async fn render(&self, name: &str, locals: &Value) -> Result<String, ViewError>;

    /// True if the named view exists.
    async fn exists(&self, name: &str) -> bool;
}
