//! `postrelay run` — start the relay server.
//!
//! Builds the immutable [`RelayConfig`] once, starts the Axum HTTP
//! server, and serves until SIGTERM / Ctrl+C. A missing or malformed
//! upstream URL is logged but does not stop the server: every forward
//! then fails with a configuration or upstream error.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::validation::{validate_upstream_url, warnings};
use crate::config::{RelayConfig, UPSTREAM_URL_ENV};
use crate::error::RelayError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), RelayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_ref()
        .map(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let config = RelayConfig::new(args.upstream_url);
    report_config(&config);

    let state = Arc::new(AppState::new(config));
    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, max_body = args.max_body, "postrelay started");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("postrelay stopped");
    Ok(())
}

fn report_config(config: &RelayConfig) {
    let Some(url) = config.upstream_url() else {
        tracing::warn!(
            env = UPSTREAM_URL_ENV,
            "upstream URL not set; every request will fail with a configuration error"
        );
        return;
    };

    if let Err(e) = validate_upstream_url(url) {
        tracing::warn!(error = %e, "upstream URL looks invalid; forwards will likely fail");
    }
    for warning in warnings(config) {
        tracing::warn!(%warning, "upstream URL warning");
    }
}
