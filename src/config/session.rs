//! Session cookie and store configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const DEFAULT_SECRET: &str = "devex-development-session-secret";

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie and CSRF tokens
    #[serde(default = "default_secret")]
    pub secret: Secret<String>,

    /// Cookie name carrying the session identifier
    #[serde(default = "default_key")]
    pub key: String,

    /// Table (collection) holding session records
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Cookie max-age in milliseconds, applied only in development or on the local domain
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,

    /// Period of the sweep deleting expired session records, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default = "default_true")]
    pub http_only: bool,

    /// Requested `Secure` flag; only honoured when TLS is enabled
    #[serde(default)]
    pub secure: bool,

    /// Share the primary database pool with the session store
    #[serde(default = "default_true")]
    pub share_connection: bool,
}

impl SessionConfig {
    /// Cookie max-age as a duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Raw secret bytes for signing.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    /// True when the configured secret is the built-in development value.
    pub fn uses_default_secret(&self) -> bool {
        self.secret.expose_secret() == DEFAULT_SECRET
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.secret.expose_secret().len() < 16 {
            return Err(ValidationError::SessionSecretTooShort);
        }
        let valid_key = !self.key.is_empty()
            && self
                .key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
        if !valid_key {
            return Err(ValidationError::InvalidSessionKey);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            key: default_key(),
            collection: default_collection(),
            max_age_ms: default_max_age_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
            http_only: true,
            secure: false,
            share_connection: true,
        }
    }
}

fn default_secret() -> Secret<String> {
    Secret::new(DEFAULT_SECRET.to_string())
}

fn default_key() -> String {
    "sessionId".to_string()
}

fn default_collection() -> String {
    "sessions".to_string()
}

fn default_max_age_ms() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_sweep_interval_secs() -> u64 {
    15 * 60
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.key, "sessionId");
        assert!(config.http_only);
        assert!(!config.secure);
        assert!(config.share_connection);
        assert_eq!(config.max_age(), Duration::from_secs(86_400));
        assert_eq!(config.sweep_interval(), Duration::from_secs(900));
        assert!(config.uses_default_secret());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = SessionConfig {
            secret: Secret::new("short".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::SessionSecretTooShort)
        ));
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let config = SessionConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSweepInterval)
        ));
    }

    #[test]
    fn test_cookie_name_with_separator_rejected() {
        let config = SessionConfig {
            key: "session;id".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSessionKey)
        ));
    }
}
