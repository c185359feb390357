//! `postrelay validate` — check the upstream URL without starting.

use crate::cli::ValidateArgs;
use crate::config::validation::{validate_upstream_url, warnings};
use crate::config::{RelayConfig, UPSTREAM_URL_ENV};
use crate::error::RelayError;

pub fn execute(args: ValidateArgs) -> Result<(), RelayError> {
    let config = RelayConfig::new(args.upstream_url);
    check(&config)?;

    for warning in warnings(&config) {
        println!("\u{26a0} {warning}");
    }
    println!("\u{2713} upstream URL is valid");
    Ok(())
}

fn check(config: &RelayConfig) -> Result<(), RelayError> {
    let url = config
        .upstream_url()
        .ok_or_else(|| RelayError::UpstreamNotSet {
            hint: format!("Set {UPSTREAM_URL_ENV} or pass --upstream-url <url>."),
        })?;
    validate_upstream_url(url).map_err(RelayError::InvalidUpstream)
}
