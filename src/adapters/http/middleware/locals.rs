//! Template locals shared by every rendered page, plus the per-request
//! `host` and `url` values.
//!
//! The server runs behind a proxy: `X-Forwarded-Proto` and
//! `X-Forwarded-Host` are trusted when present.

use axum::{
    extract::Request,
    http::{header, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::config::{AppConfig, FeatureFlags};

/// Values computed once at startup and rendered into every view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLocals {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub google_analytics_tracking_id: Option<String>,
    pub facebook_app_id: Option<String>,
    pub logo: String,
    pub favicon: String,
    pub js_files: Vec<String>,
    pub css_files: Vec<String>,
    pub features: FeatureFlags,
    pub livereload: bool,
    pub env: String,
    pub domain: String,
    pub session_timeout: u64,
    pub session_timeout_warning: u64,
    /// Served over TLS
    pub secure: bool,
}

impl TemplateLocals {
    pub fn from_config(config: &AppConfig) -> Self {
        let app = &config.app;
        Self {
            title: app.title.clone(),
            description: app.description.clone(),
            keywords: app.keywords.clone(),
            google_analytics_tracking_id: app.google_analytics_tracking_id.clone(),
            facebook_app_id: app.facebook_app_id.clone(),
            logo: app.logo.clone(),
            favicon: app.favicon.clone(),
            js_files: app.js_files.clone(),
            css_files: app.css_files.clone(),
            features: config.features.clone(),
            livereload: app.livereload,
            env: config.server.environment.as_str().to_string(),
            domain: app.domain.clone(),
            session_timeout: app.session_timeout,
            session_timeout_warning: app.session_timeout_warning,
            secure: config.security.ssl,
        }
    }
}

/// Absolute URLs of the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestUrls {
    /// `{protocol}://{hostname}`
    pub host: String,
    /// `host` followed by the original path and query.
    pub url: String,
}

impl RequestUrls {
    pub fn resolve(headers: &HeaderMap, uri: &Uri) -> Self {
        let protocol = first_value(headers, "x-forwarded-proto").unwrap_or("http");
        let hostname = first_value(headers, "x-forwarded-host")
            .or_else(|| headers.get(header::HOST).and_then(|v| v.to_str().ok()))
            .or_else(|| uri.authority().map(|a| a.as_str()))
            .unwrap_or("localhost");
        let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

        let host = format!("{protocol}://{hostname}");
        Self {
            url: format!("{host}{path}"),
            host,
        }
    }
}

fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Expose [`RequestUrls`] to handlers.
pub async fn request_urls(mut request: Request, next: Next) -> Response {
    let urls = RequestUrls::resolve(request.headers(), request.uri());
    request.extensions_mut().insert(urls);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_http_request() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "devex.local:3030".parse().unwrap());
        let urls = RequestUrls::resolve(&headers, &"/programs?page=2".parse().unwrap());
        assert_eq!(urls.host, "http://devex.local:3030");
        assert_eq!(urls.url, "http://devex.local:3030/programs?page=2");
    }

    #[test]
    fn forwarded_protocol_is_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "devex.example.org".parse().unwrap());
        headers.insert("x-forwarded-proto", "https, http".parse().unwrap());
        let urls = RequestUrls::resolve(&headers, &"/".parse().unwrap());
        assert_eq!(urls.host, "https://devex.example.org");
    }

    #[test]
    fn locals_reflect_configuration() {
        let mut config = AppConfig::default();
        config.app.js_files = vec!["/lib/app.js".to_string()];
        config.security.ssl = true;
        let locals = TemplateLocals::from_config(&config);
        assert_eq!(locals.env, "development");
        assert!(locals.secure);

        let json = serde_json::to_value(&locals).unwrap();
        assert_eq!(json["jsFiles"][0], "/lib/app.js");
        assert_eq!(json["sessionTimeout"], 300);
    }
}
