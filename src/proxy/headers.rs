//! Outbound header construction and response framing-header stripping.
//!
//! The relay sends the upstream nothing but a JSON content type and its
//! own user agent. On the way back every upstream header is kept except
//! the hop-by-hop set, which only describes the upstream connection.

use std::sync::LazyLock;

use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

static RELAY_USER_AGENT: LazyLock<HeaderValue> = LazyLock::new(|| {
    HeaderValue::from_static(concat!("postrelay/", env!("CARGO_PKG_VERSION")))
});

/// Strip hop-by-hop headers and `content-length` from an upstream response.
///
/// The body has already been fully collected, so `transfer-encoding` and
/// `content-length` from the origin are no longer accurate. Axum sets the
/// correct `content-length` from the buffered bytes.
pub fn strip_response_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    headers.remove(CONTENT_LENGTH);
}

#[must_use]
pub fn build_outbound_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, RELAY_USER_AGENT.clone());
    headers
}

/// Whether an inbound `Content-Type` names a JSON media type:
/// `application/json` or any `application/*+json`, parameters ignored.
#[must_use]
pub fn is_json_content_type(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
