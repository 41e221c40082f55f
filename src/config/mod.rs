//! Application configuration module
//!
//! Configuration is loaded once at startup from optional config files and
//! environment variables, validated, and then shared immutably by every
//! bootstrap stage. Environment variables use the `DEVEX` prefix and `__`
//! as the nesting separator.
//!
//! # Example
//!
//! ```no_run
//! use devex_server::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod app;
mod assets;
mod database;
mod error;
mod features;
mod log;
mod security;
mod server;
mod session;

pub use app::{AppMetaConfig, LOCAL_DOMAIN};
pub use assets::{AssetsConfig, DEFAULT_BODY_LIMIT, STATIC_MAX_AGE_MS};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use log::{AccessLogFormat, LogConfig};
pub use security::{CsrfConfig, SecurityConfig};
pub use server::{Environment, LogFormat, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Page metadata and client asset lists
    #[serde(default)]
    pub app: AppMetaConfig,

    #[serde(default)]
    pub features: FeatureFlags,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub session: SessionConfig,

    /// TLS flag and CSRF settings
    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    /// Access log settings
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. `.env` file if present
    /// 2. `config/default.*` if present
    /// 3. `config/{DEVEX_ENV}.*` if present
    /// 4. `DEVEX__SECTION__KEY` environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a source cannot be read or a value cannot be
    /// parsed into its typed field.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let profile = std::env::var("DEVEX_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{profile}")).required(false))
            .add_source(
                config::Environment::default()
                    .prefix("DEVEX")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("app.js_files")
                    .with_list_parse_key("app.css_files")
                    .with_list_parse_key("assets.static_folders")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.session.validate()?;
        self.security.validate()?;
        self.assets.validate()?;
        if self.is_production() && self.session.uses_default_secret() {
            return Err(ValidationError::DefaultSessionSecret);
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Whether the session cookie carries an explicit max-age.
    ///
    /// Persistent cookies are used in development and whenever the app is
    /// served from the local domain; otherwise cookies are session-scoped.
    pub fn persistent_session_cookie(&self) -> bool {
        self.server.is_development() || self.app.is_local_domain()
    }

    /// Whether the session cookie is flagged `Secure`.
    pub fn secure_session_cookie(&self) -> bool {
        self.session.secure && self.security.ssl
    }

    /// Templates are cached everywhere except development.
    pub fn view_cache_enabled(&self) -> bool {
        !self.server.is_development()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("DEVEX__DATABASE__URL", "postgresql://test@localhost/test");
    }

    fn clear_env() {
        env::remove_var("DEVEX__DATABASE__URL");
        env::remove_var("DEVEX__SERVER__PORT");
        env::remove_var("DEVEX__SERVER__ENVIRONMENT");
        env::remove_var("DEVEX__SESSION__KEY");
        env::remove_var("DEVEX__SECURITY__SSL");
        env::remove_var("DEVEX__ASSETS__STATIC_FOLDERS");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DEVEX__SESSION__KEY", "devex.sid");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.session.key, "devex.sid");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3030);
        assert_eq!(config.server.environment, Environment::Development);
        assert!(!config.security.ssl);
    }

    #[test]
    fn test_static_folders_list() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DEVEX__ASSETS__STATIC_FOLDERS", "modules,lib");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.assets.static_folders, vec!["modules", "lib"]);
    }

    #[test]
    fn test_production_requires_custom_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DEVEX__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::DefaultSessionSecret)
        ));
    }

    #[test]
    fn test_session_cookie_persistence_rules() {
        let mut config = AppConfig::default();
        assert!(config.persistent_session_cookie());

        config.server.environment = Environment::Production;
        assert!(config.persistent_session_cookie(), "local domain keeps max-age");

        config.app.domain = "https://devex.example.org".to_string();
        assert!(!config.persistent_session_cookie());
    }

    #[test]
    fn test_secure_cookie_requires_ssl() {
        let mut config = AppConfig::default();
        config.session.secure = true;
        assert!(!config.secure_session_cookie());

        config.security.ssl = true;
        assert!(config.secure_session_cookie());
    }
}
