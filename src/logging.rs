//! `tracing` subscriber for the relay.
//!
//! The relay's own events follow `--log-level`. The HTTP client stack
//! (hyper, rustls) is capped at `warn` unless the relay runs at `trace`,
//! so one forwarded request does not bury its own `request received` /
//! `upstream responded` pair under connection-pool chatter. JSON lines
//! put event fields such as `correlation_id` at the top level, with the
//! enclosing `TraceLayer` request span alongside.

use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;

/// Client-side crates whose debug output is per-connection noise.
const TRANSPORT_TARGETS: [&str; 4] = ["hyper", "hyper_util", "rustls", "h2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// `--json` wins over `--pretty`; with neither, a terminal gets pretty output.
#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else if pretty || std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[must_use]
pub fn filter_for(level: Level) -> Targets {
    let transport = if level == Level::TRACE {
        Level::TRACE
    } else {
        Level::WARN.min(level)
    };
    TRANSPORT_TARGETS
        .iter()
        .fold(Targets::new().with_default(level), |targets, target| {
            targets.with_target(*target, transport)
        })
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(filter_for(level.to_tracing_level()));

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(false),
            )
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }
}
