//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate, health), and their associated argument
//! structs. Every flag has an environment variable equivalent for
//! container and serverless deployments.

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "postrelay",
    version,
    about = "JSON POST relay for a private upstream API",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        PRIVATE_API_URL=https://10.0.0.5:8443 postrelay run\n  \
        postrelay run --upstream-url http://localhost:9000 -p 8080 --pretty"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Run(Box<RunArgs>),

    /// Check the configured upstream URL without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Upstream base URL that requests are forwarded to
    #[arg(long, env = "PRIVATE_API_URL", hide_env_values = true)]
    pub upstream_url: Option<String>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Observability --
    /// Sentry DSN (enables error tracking)
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_DSN", help_heading = "Observability")]
    pub sentry_dsn: Option<String>,

    /// Sentry environment tag
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_ENVIRONMENT", help_heading = "Observability")]
    pub sentry_environment: Option<String>,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Upstream base URL to check
    #[arg(long, env = "PRIVATE_API_URL", hide_env_values = true)]
    pub upstream_url: Option<String>,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_parses_flags() {
        let cli = Cli::try_parse_from([
            "postrelay",
            "run",
            "--upstream-url",
            "http://localhost:9000",
            "-p",
            "8080",
            "--pretty",
        ])
        .unwrap();

        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.upstream_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(args.port, 8080);
        assert!(args.pretty);
        assert_eq!(args.max_body, 1_048_576);
    }

    #[test]
    fn pretty_and_json_conflict() {
        assert!(Cli::try_parse_from(["postrelay", "run", "--pretty", "--json"]).is_err());
    }

    #[test]
    fn health_defaults_to_localhost() {
        let cli = Cli::try_parse_from(["postrelay", "health"]).unwrap();
        let Some(Commands::Health(args)) = cli.command else {
            panic!("expected health");
        };
        assert_eq!(args.url, "http://localhost:3000");
        assert!(!args.json);
    }
}
