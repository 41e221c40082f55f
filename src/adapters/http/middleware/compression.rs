//! Response compression limited to textual content types.

use axum::http::{header, Extensions, HeaderMap, StatusCode, Version};
use tower_http::compression::{
    predicate::{And, DefaultPredicate, Predicate},
    CompressionLayer,
};

type ContentFilter = fn(StatusCode, Version, &HeaderMap, &Extensions) -> bool;

/// Content type fragments worth compressing.
const COMPRESSIBLE: [&str; 6] = ["json", "text", "javascript", "css", "font", "svg"];

pub fn is_compressible(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    COMPRESSIBLE
        .iter()
        .any(|fragment| content_type.contains(fragment))
}

fn compressible_response(
    _status: StatusCode,
    _version: Version,
    headers: &HeaderMap,
    _extensions: &Extensions,
) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(is_compressible)
        .unwrap_or(false)
}

/// Gzip layer applying the default size threshold plus the content filter.
pub fn compression_layer() -> CompressionLayer<And<DefaultPredicate, ContentFilter>> {
    CompressionLayer::new()
        .compress_when(DefaultPredicate::new().and(compressible_response as ContentFilter))
}
