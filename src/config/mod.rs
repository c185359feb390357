//! Relay configuration.
//!
//! [`RelayConfig`] holds the upstream base URL. It is built once at
//! startup from the `PRIVATE_API_URL` environment variable (or the
//! equivalent CLI flag) and shared read-only with every request.

pub mod validation;

/// Environment variable holding the upstream base URL.
pub const UPSTREAM_URL_ENV: &str = "PRIVATE_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayConfig {
    upstream_url: Option<String>,
}

impl RelayConfig {
    /// An empty value is treated the same as an absent one.
    #[must_use]
    pub fn new(upstream_url: Option<String>) -> Self {
        Self {
            upstream_url: upstream_url.filter(|url| !url.is_empty()),
        }
    }

    #[must_use]
    pub fn upstream_url(&self) -> Option<&str> {
        self.upstream_url.as_deref()
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.upstream_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_unset() {
        let config = RelayConfig::new(Some(String::new()));
        assert!(!config.is_configured());
        assert_eq!(config.upstream_url(), None);
    }

    #[test]
    fn missing_url_is_unset() {
        assert!(!RelayConfig::new(None).is_configured());
        assert_eq!(RelayConfig::default(), RelayConfig::new(None));
    }

    #[test]
    fn url_is_kept_verbatim() {
        let config = RelayConfig::new(Some("https://api.example.com/".into()));
        assert_eq!(config.upstream_url(), Some("https://api.example.com/"));
    }
}
