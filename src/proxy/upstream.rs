//! The outbound side of the relay.
//!
//! [`Upstream`] is the seam between the forwarder and the network: the
//! production [`HyperUpstream`] posts through the shared hyper/rustls
//! client, while tests substitute an in-memory recorder.
//!
//! Upstream redirects are followed inside the relay, so the caller only
//! ever sees the final response and never a `Location` pointing at the
//! private upstream.

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use tower::ServiceExt;
use tower_http::follow_redirect::policy::{Action, Attempt, Policy, Standard};
use tower_http::follow_redirect::{FollowRedirect, RequestUri};

use crate::error::ForwardError;
use crate::server::HttpClient;

use super::headers::build_outbound_headers;

/// A complete, buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

// async_trait is required here because Upstream is used as Arc<dyn Upstream>.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// POST a JSON body to `url` and return the buffered response.
    ///
    /// Transport failures and 4xx/5xx statuses are reported as
    /// [`ForwardError::Upstream`].
    async fn post_json(&self, url: &str, body: Bytes) -> Result<UpstreamResponse, ForwardError>;
}

/// tower-http's standard redirect policy (at most 20 hops, credentials
/// dropped across origins) that can also replay the JSON body, so 307 and
/// 308 re-POST the same payload.
#[derive(Debug, Clone, Default)]
pub struct RedirectPolicy(Standard);

impl<E> Policy<Full<Bytes>, E> for RedirectPolicy {
    fn redirect(&mut self, attempt: &Attempt<'_>) -> Result<Action, E> {
        Policy::<Full<Bytes>, E>::redirect(&mut self.0, attempt)
    }

    fn on_request(&mut self, request: &mut http::Request<Full<Bytes>>) {
        Policy::<Full<Bytes>, E>::on_request(&mut self.0, request);
    }

    fn clone_body(&self, body: &Full<Bytes>) -> Option<Full<Bytes>> {
        Some(body.clone())
    }
}

pub type RedirectingClient = FollowRedirect<HttpClient, RedirectPolicy>;

pub struct HyperUpstream {
    client: RedirectingClient,
}

impl HyperUpstream {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client: FollowRedirect::with_policy(client, RedirectPolicy::default()),
        }
    }
}

#[async_trait]
impl Upstream for HyperUpstream {
    async fn post_json(&self, url: &str, body: Bytes) -> Result<UpstreamResponse, ForwardError> {
        let uri: hyper::Uri = url.parse().map_err(|e: http::uri::InvalidUri| {
            ForwardError::Upstream(format!("Invalid URL '{url}': {e}"))
        })?;

        let mut req_builder = hyper::Request::builder().method(Method::POST).uri(uri);
        for (key, value) in &build_outbound_headers() {
            req_builder = req_builder.header(key, value);
        }
        let req = req_builder
            .body(Full::new(body))
            .map_err(|e| ForwardError::Internal(e.to_string()))?;

        let response = self
            .client
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| ForwardError::Upstream(error_chain(&e)))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            // Report the URL that actually answered, which differs after a redirect.
            let final_url = response
                .extensions()
                .get::<RequestUri>()
                .map_or_else(|| url.to_string(), |RequestUri(uri)| uri.to_string());
            return Err(ForwardError::Upstream(status_error(status, &final_url)));
        }

        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ForwardError::Upstream(format!("body read error: {}", error_chain(&e))))?
            .to_bytes();

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Describe an upstream error status, e.g.
/// `404 Client Error: Not Found for url: http://host/path`.
#[must_use]
pub fn status_error(status: StatusCode, url: &str) -> String {
    let kind = if status.is_server_error() {
        "Server"
    } else {
        "Client"
    };
    let reason = status.canonical_reason().unwrap_or("Unknown");
    format!("{} {kind} Error: {reason} for url: {url}", status.as_u16())
}

/// Flatten an error and its sources into one line. hyper wraps the
/// useful part (refused, DNS, TLS) a few levels down.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
