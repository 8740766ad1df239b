//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream base URL is a usable origin
//! - Check allowed origins are bare origins (scheme + host + port)
//! - Validate value ranges (timeouts > 0, paths absolute)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::forward::upstream::UpstreamTarget;

/// A single semantic defect in a [`ProxyConfig`].
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("upstream.base_url {url:?} is invalid: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("cors.allowed_origins entry {0:?} is not a bare origin (scheme://host[:port])")]
    InvalidOrigin(String),

    #[error("{field} must start with '/' (got {value:?})")]
    RelativePath { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("fetch.timeout_secs ({fetch}) must be below timeouts.request_secs ({request})")]
    FetchTimeoutAboveRequestCeiling { fetch: u64, request: u64 },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Err(e) = UpstreamTarget::parse(&config.upstream.base_url) {
        errors.push(ValidationError::InvalidUpstreamUrl {
            url: e.url,
            reason: e.reason,
        });
    }

    if !config.upstream.path_prefix.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field: "upstream.path_prefix",
            value: config.upstream.path_prefix.clone(),
        });
    }

    if !config.fetch.path.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field: "fetch.path",
            value: config.fetch.path.clone(),
        });
    }

    for origin in &config.cors.allowed_origins {
        if !is_bare_origin(origin) {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if config.fetch.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("fetch.timeout_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    // The fetch route reports its own timeout error; the whole-request
    // ceiling must not fire first.
    if config.fetch.timeout_secs > 0
        && config.timeouts.request_secs > 0
        && config.fetch.timeout_secs >= config.timeouts.request_secs
    {
        errors.push(ValidationError::FetchTimeoutAboveRequestCeiling {
            fetch: config.fetch.timeout_secs,
            request: config.timeouts.request_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// An allow-list entry must be exactly a scheme + host (+ port): the browser
/// sends the `Origin` header in that shape and matching is exact-string.
fn is_bare_origin(origin: &str) -> bool {
    let url = match Url::parse(origin) {
        Ok(u) => u,
        Err(_) => return false,
    };
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return false;
    }
    // Url normalizes a bare origin to a single trailing "/"; anything more
    // means the entry carried a path, query, or fragment.
    url.path() == "/" && url.query().is_none() && url.fragment().is_none() && !origin.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-addr".into();
        config.upstream.base_url = "ftp://nope".into();
        config.fetch.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn origin_entries_must_be_bare() {
        let mut config = ProxyConfig::default();
        config.cors.allowed_origins = vec![
            "http://localhost:52076".into(), // ok
            "http://localhost:52076/app".into(),
            "localhost:52076".into(),
            "http://localhost:52076/".into(), // trailing slash is not an Origin value
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn fetch_timeout_must_fit_under_request_ceiling() {
        let mut config = ProxyConfig::default();
        config.fetch.timeout_secs = 60;
        config.timeouts.request_secs = 60;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn paths_must_be_absolute() {
        let mut config = ProxyConfig::default();
        config.upstream.path_prefix = "api".into();
        config.fetch.path = "proxy".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
