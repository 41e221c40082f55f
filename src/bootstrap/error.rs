//! Fatal startup errors.

use std::path::PathBuf;
use thiserror::Error;

/// Any failure that aborts server startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Static directory not found: {}", .0.display())]
    StaticDirMissing(PathBuf),

    #[error("Session secret rejected: {0}")]
    SessionSecret(String),

    #[error("Invalid CSRF header name: {0}")]
    CsrfHeader(String),

    #[error("Module '{module}' failed to configure: {message}")]
    ModuleConfiguration {
        module: &'static str,
        message: String,
    },

    #[error("Route '{path}' registered by both '{first}' and '{second}'")]
    DuplicateRoute {
        path: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Modules '{first}' and '{second}' both register a fallback")]
    DuplicateFallback {
        first: &'static str,
        second: &'static str,
    },
}

impl BootstrapError {
    pub fn module(module: &'static str, message: impl Into<String>) -> Self {
        Self::ModuleConfiguration {
            module,
            message: message.into(),
        }
    }
}
