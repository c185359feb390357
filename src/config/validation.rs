//! Upstream URL validation.
//!
//! The relay never rewrites the configured URL; these checks only
//! report problems, as a startup warning from `run` or a hard failure
//! from `validate`.

use url::Url;

use super::RelayConfig;

/// Validate an upstream base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_upstream_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                return Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ));
            }
            if parsed.query().is_some() || parsed.fragment().is_some() {
                return Err(format!(
                    "'{url}' has a query or fragment; the forwarded path would be appended after it"
                ));
            }
            Ok(())
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Non-fatal observations about a configured URL that still forwards.
#[must_use]
pub fn warnings(config: &RelayConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if let Some(url) = config.upstream_url() {
        if url.ends_with('/') {
            warnings.push(format!(
                "upstream URL '{url}' ends with '/'; forwarded URLs will contain '//'"
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_upstream_url("http://10.0.0.5:8080").is_ok());
        assert!(validate_upstream_url("https://api.example.com/v1").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        let err = validate_upstream_url("ftp://files.example.com").unwrap_err();
        assert!(err.contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn rejects_garbage() {
        let err = validate_upstream_url("not a url").unwrap_err();
        assert!(err.contains("is not a valid URL"));
    }

    #[test]
    fn rejects_query_string() {
        assert!(validate_upstream_url("https://api.example.com?key=1").is_err());
    }

    #[test]
    fn warns_on_trailing_slash() {
        let config = RelayConfig::new(Some("https://api.example.com/".into()));
        assert_eq!(warnings(&config).len(), 1);

        let config = RelayConfig::new(Some("https://api.example.com".into()));
        assert!(warnings(&config).is_empty());
    }
}
