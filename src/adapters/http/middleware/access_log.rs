//! Access logging, enabled when a log format is configured.
//!
//! Lines are emitted as `tracing` events under the `access` target. The
//! user token is the signed-in user's `Name <email>` or `anonymous`.

use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::config::AccessLogFormat;

/// Identity reported by the session layer for the access log.
#[derive(Debug, Clone, Default)]
pub struct AccessLogUser(pub Option<String>);

const ANONYMOUS: &str = "anonymous";

/// Request fields captured before the handler consumes the request.
#[derive(Debug, Clone)]
pub struct RequestLine {
    pub remote: String,
    pub method: String,
    pub uri: String,
    pub version: String,
    pub referrer: String,
    pub user_agent: String,
}

impl RequestLine {
    pub fn from_request(request: &Request) -> Self {
        let headers = request.headers();
        Self {
            remote: remote_addr(headers),
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            version: format!("{:?}", request.version()),
            referrer: header_or_dash(headers, header::REFERER),
            user_agent: header_or_dash(headers, header::USER_AGENT),
        }
    }
}

fn header_or_dash(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

fn remote_addr(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Render one access log line.
pub fn format_line(
    format: AccessLogFormat,
    line: &RequestLine,
    user: &str,
    status: StatusCode,
    length: Option<&str>,
    elapsed: Duration,
) -> String {
    let length = length.unwrap_or("-");
    let millis = elapsed.as_secs_f64() * 1000.0;
    match format {
        AccessLogFormat::Combined => format!(
            r#"{} - {} [{}] "{} {} {}" {} {} "{}" "{}""#,
            line.remote,
            user,
            Utc::now().format("%d/%b/%Y:%H:%M:%S %z"),
            line.method,
            line.uri,
            line.version,
            status.as_u16(),
            length,
            line.referrer,
            line.user_agent
        ),
        AccessLogFormat::Common => format!(
            r#"{} - {} [{}] "{} {} {}" {} {}"#,
            line.remote,
            user,
            Utc::now().format("%d/%b/%Y:%H:%M:%S %z"),
            line.method,
            line.uri,
            line.version,
            status.as_u16(),
            length
        ),
        AccessLogFormat::Short => format!(
            "{} {} {} {} {} {} - {:.3} ms",
            line.remote,
            user,
            line.method,
            line.uri,
            line.version,
            status.as_u16(),
            millis
        ),
        AccessLogFormat::Dev => format!(
            "{} {} {} {:.3} ms - {}",
            line.method,
            line.uri,
            status.as_u16(),
            millis,
            length
        ),
    }
}

pub async fn access_log(
    State(format): State<AccessLogFormat>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let line = RequestLine::from_request(&request);

    let response = next.run(request).await;

    let user = response
        .extensions()
        .get::<AccessLogUser>()
        .and_then(|u| u.0.clone())
        .unwrap_or_else(|| ANONYMOUS.to_string());
    let length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok());

    let rendered = format_line(
        format,
        &line,
        &user,
        response.status(),
        length,
        started.elapsed(),
    );
    tracing::info!(target: "access", status = response.status().as_u16(), user = %user, "{}", rendered);
    response
}
