//! `postrelay health` — query `GET /health` on a running relay.

use std::fmt::Write;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};

use crate::cli::HealthArgs;
use crate::error::RelayError;
use crate::health::HealthResponse;
use crate::server::build_http_client;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), RelayError> {
    let body = fetch_health(&args.url).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print!("{}", render(&args.url, &health)),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }
    Ok(())
}

/// GET `{base}/health` with the relay's own client, so `https://` works too.
async fn fetch_health(base: &str) -> Result<Bytes, RelayError> {
    let uri: hyper::Uri = format!("{}/health", base.trim_end_matches('/'))
        .parse()
        .map_err(|e: http::uri::InvalidUri| RelayError::UriParse {
            source: Box::new(e),
        })?;

    let req = hyper::Request::get(uri)
        .body(Full::new(Bytes::new()))
        .map_err(|e| RelayError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(HEALTH_TIMEOUT, build_http_client().request(req))
        .await
        .map_err(|_| RelayError::HttpRequest {
            source: format!("health check timed out after {}s", HEALTH_TIMEOUT.as_secs()).into(),
        })?
        .map_err(|e| RelayError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(RelayError::HealthCheckFailed(status));
    }

    Ok(response
        .into_body()
        .collect()
        .await
        .map_err(|e| RelayError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes())
}

fn render(url: &str, health: &HealthResponse) -> String {
    let mut out = String::new();
    // write! to String is infallible
    let _ = writeln!(out, "\u{2713} postrelay is healthy ({url})");
    let _ = writeln!(out, "  version:   {}", health.version);
    let _ = writeln!(out, "  uptime:    {}", format_uptime(health.uptime_seconds));
    if health.upstream_configured {
        let _ = writeln!(out, "  upstream:  configured");
    } else {
        let _ = writeln!(
            out,
            "  upstream:  \u{26a0} NOT SET (every request fails with a configuration error)"
        );
    }
    let _ = writeln!(
        out,
        "  requests:  {} forwarded, {} failed",
        health.stats.requests_forwarded, health.stats.requests_failed
    );
    out
}

fn format_uptime(seconds: u64) -> String {
    match (seconds / 3600, (seconds % 3600) / 60, seconds % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, s) => format!("{h}h {m}m {s}s"),
    }
}
