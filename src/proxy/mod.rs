//! Core HTTP request forwarding.
//!
//! [`forward_handler`] is the Axum fallback that receives every POST,
//! hands it to [`forward`], and converts the outcome into a response:
//! the upstream's status, headers, and body on success, or a JSON error
//! object from [`ForwardError`]. Submodules handle outbound headers
//! ([`headers`]) and the network call ([`upstream`]).

pub mod headers;
pub mod upstream;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, State};
use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::ForwardError;
use crate::server::AppState;

use upstream::{Upstream, UpstreamResponse};

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(ALLOW, HeaderValue::from_static("POST"))],
        )
            .into_response();
    }

    let correlation_id = req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);
    let path = request_path(&uri);
    let content_type = req_headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

    tracing::info!(
        correlation_id = %correlation_id,
        client_ip = %addr.ip(),
        path = %path,
        bytes = body.len(),
        "request received"
    );

    let start = Instant::now();
    let result = forward(
        &state.config,
        state.upstream.as_ref(),
        path,
        content_type,
        &body,
    )
    .await;
    #[allow(clippy::cast_possible_truncation)]
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(upstream_response) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                correlation_id = %correlation_id,
                status = upstream_response.status.as_u16(),
                latency_ms,
                "upstream responded"
            );
            into_passthrough(upstream_response)
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            match &e {
                ForwardError::BadRequest => tracing::warn!(
                    correlation_id = %correlation_id,
                    error = %e,
                    "rejected request"
                ),
                _ => tracing::error!(
                    correlation_id = %correlation_id,
                    error = %e,
                    latency_ms,
                    "forward failed"
                ),
            }
            e.into_response()
        }
    }
}

/// Forward one inbound request to the configured upstream.
///
/// Nothing is sent upstream unless the relay is configured and the body
/// is a non-empty JSON value. Exactly one outbound call is made otherwise.
pub async fn forward(
    config: &RelayConfig,
    upstream: &dyn Upstream,
    path: &str,
    content_type: Option<&str>,
    raw_body: &[u8],
) -> Result<UpstreamResponse, ForwardError> {
    let base_url = config.upstream_url().ok_or(ForwardError::Configuration)?;

    if !headers::is_json_content_type(content_type) {
        return Err(ForwardError::BadRequest);
    }
    let payload = parse_payload(raw_body).ok_or(ForwardError::BadRequest)?;

    let url = build_forward_url(base_url, path);
    let body = serde_json::to_vec(&payload).map_err(|e| ForwardError::Internal(e.to_string()))?;

    upstream.post_json(&url, Bytes::from(body)).await
}

/// Literal `{base}/{path}` join: no escaping, no slash normalization.
#[must_use]
pub fn build_forward_url(base_url: &str, path: &str) -> String {
    format!("{base_url}/{path}")
}

/// Parse a request body, returning `None` when it is not JSON or holds
/// an empty value (`null`, `false`, `0`, `""`, `[]`, `{}`).
#[must_use]
pub fn parse_payload(raw_body: &[u8]) -> Option<Value> {
    let value: Value = serde_json::from_slice(raw_body).ok()?;
    let empty = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    };
    (!empty).then_some(value)
}

/// The path remainder after the leading `/`; empty for the root.
#[must_use]
pub fn request_path(uri: &Uri) -> &str {
    let path = uri.path();
    path.strip_prefix('/').unwrap_or(path)
}

fn into_passthrough(upstream_response: UpstreamResponse) -> Response {
    let UpstreamResponse {
        status,
        headers: mut resp_headers,
        body,
    } = upstream_response;
    headers::strip_response_hop_by_hop(&mut resp_headers);

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = resp_headers;
    response
}
