//! TLS and CSRF configuration

use http::HeaderName;
use serde::Deserialize;

use super::error::ValidationError;

/// Security configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    /// Whether the server is reached over TLS
    #[serde(default)]
    pub ssl: bool,

    #[serde(default)]
    pub csrf: CsrfConfig,
}

/// Anti-forgery token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CsrfConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Request header carrying the token on unsafe methods
    #[serde(default = "default_header")]
    pub header: String,

    /// Readable cookie exposing the token to browser clients
    #[serde(default = "default_cookie")]
    pub cookie: String,
}

impl SecurityConfig {
    /// Validate security configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        HeaderName::from_bytes(self.csrf.header.as_bytes())
            .map_err(|_| ValidationError::InvalidCsrfHeader)?;
        Ok(())
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            header: default_header(),
            cookie: default_cookie(),
        }
    }
}

fn default_header() -> String {
    "x-xsrf-token".to_string()
}

fn default_cookie() -> String {
    "XSRF-TOKEN".to_string()
}
