//! Application metadata configuration (values rendered into every page)

use serde::Deserialize;

/// Domain that keeps session cookies persistent even outside development.
pub const LOCAL_DOMAIN: &str = "http://localhost:3030";

/// Application metadata and client asset lists
#[derive(Debug, Clone, Deserialize)]
pub struct AppMetaConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default)]
    pub keywords: String,

    /// Public base URL of the application
    #[serde(default = "default_domain")]
    pub domain: String,

    #[serde(default)]
    pub google_analytics_tracking_id: Option<String>,

    #[serde(default)]
    pub facebook_app_id: Option<String>,

    #[serde(default = "default_logo")]
    pub logo: String,

    /// Path of the favicon file served at `/favicon.ico`
    #[serde(default = "default_favicon")]
    pub favicon: String,

    /// Client script URLs injected into the layout
    #[serde(default)]
    pub js_files: Vec<String>,

    /// Client stylesheet URLs injected into the layout
    #[serde(default)]
    pub css_files: Vec<String>,

    #[serde(default)]
    pub livereload: bool,

    /// Idle seconds before the client warns about session expiry
    #[serde(default = "default_session_timeout")]
    pub session_timeout: u64,

    /// Seconds the expiry warning stays visible
    #[serde(default = "default_session_timeout")]
    pub session_timeout_warning: u64,
}

impl AppMetaConfig {
    /// True when the app is served from the local development domain.
    pub fn is_local_domain(&self) -> bool {
        self.domain == LOCAL_DOMAIN
    }
}

impl Default for AppMetaConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            keywords: String::new(),
            domain: default_domain(),
            google_analytics_tracking_id: None,
            facebook_app_id: None,
            logo: default_logo(),
            favicon: default_favicon(),
            js_files: Vec::new(),
            css_files: Vec::new(),
            livereload: false,
            session_timeout: default_session_timeout(),
            session_timeout_warning: default_session_timeout(),
        }
    }
}

fn default_title() -> String {
    "Developers' Exchange".to_string()
}

fn default_description() -> String {
    "Connecting government with the developer community".to_string()
}

fn default_domain() -> String {
    LOCAL_DOMAIN.to_string()
}

fn default_logo() -> String {
    "/public/img/logo.png".to_string()
}

fn default_favicon() -> String {
    "public/favicon.ico".to_string()
}

fn default_session_timeout() -> u64 {
    300
}
