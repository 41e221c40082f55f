//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address")]
    InvalidBindAddress,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Session secret must be at least 16 characters")]
    SessionSecretTooShort,

    #[error("Session cookie name contains invalid characters")]
    InvalidSessionKey,

    #[error("Session sweep interval must be positive")]
    InvalidSweepInterval,

    #[error("Session secret must be changed from the default in production")]
    DefaultSessionSecret,

    #[error("Static folder '{0}' must be a relative path segment")]
    InvalidStaticFolder(String),

    #[error("Uploads prefix must start with '/'")]
    InvalidUploadsPrefix,

    #[error("Invalid CSRF header name")]
    InvalidCsrfHeader,
}
