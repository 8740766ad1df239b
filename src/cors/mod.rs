//! CORS policy evaluation.
//!
//! # Responsibilities
//! - Hold the immutable allow-list built at startup
//! - Decide, per request origin, whether CORS headers should be attached
//!
//! # Design Decisions
//! - Exact string match on scheme + host + port (the browser sends the
//!   `Origin` header in exactly that shape)
//! - A disallowed origin is never rejected with an error status: the proxy
//!   simply omits the allow header and lets the browser enforce the block
//! - Policy is consulted by the middleware stage in `http::middleware::cors`;
//!   this module stays free of axum types so it unit-tests in isolation

use std::collections::HashSet;

use crate::config::CorsConfig;

/// Immutable CORS policy, constructed once at startup.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: HashSet<String>,
    allow_credentials: bool,
}

/// Outcome of evaluating a request origin against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsDecision {
    /// Origin is in the allow-list: echo it back, optionally with the
    /// credentials header.
    Allow {
        origin: String,
        credentials: bool,
    },
    /// Origin absent or not allowed: attach nothing.
    Skip,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Self {
        Self {
            allowed_origins: config.allowed_origins.iter().cloned().collect(),
            allow_credentials: config.allow_credentials,
        }
    }

    /// True when the given origin is in the allow-list.
    pub fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.contains(origin)
    }

    /// Decide what CORS headers (if any) a request with this `Origin`
    /// header should receive.
    pub fn evaluate(&self, origin: Option<&str>) -> CorsDecision {
        match origin {
            Some(origin) if self.allows(origin) => CorsDecision::Allow {
                origin: origin.to_string(),
                credentials: self.allow_credentials,
            },
            _ => CorsDecision::Skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(origins: &[&str], credentials: bool) -> CorsPolicy {
        CorsPolicy::from_config(&CorsConfig {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            allow_credentials: credentials,
        })
    }

    #[test]
    fn allowed_origin_is_echoed() {
        let policy = policy(&["http://localhost:52076", "http://127.0.0.1:52076"], true);

        assert_eq!(
            policy.evaluate(Some("http://localhost:52076")),
            CorsDecision::Allow {
                origin: "http://localhost:52076".into(),
                credentials: true,
            }
        );
    }

    #[test]
    fn unknown_origin_is_skipped_not_rejected() {
        let policy = policy(&["http://localhost:52076"], true);
        assert_eq!(policy.evaluate(Some("http://evil.example")), CorsDecision::Skip);
    }

    #[test]
    fn missing_origin_is_skipped() {
        let policy = policy(&["http://localhost:52076"], true);
        assert_eq!(policy.evaluate(None), CorsDecision::Skip);
    }

    #[test]
    fn match_is_exact_including_port() {
        let policy = policy(&["http://localhost:52076"], false);
        assert!(!policy.allows("http://localhost:52077"));
        assert!(!policy.allows("https://localhost:52076"));
        assert!(policy.allows("http://localhost:52076"));
    }

    #[test]
    fn credentials_flag_carries_through() {
        let policy = policy(&["http://localhost:52076"], false);
        assert_eq!(
            policy.evaluate(Some("http://localhost:52076")),
            CorsDecision::Allow {
                origin: "http://localhost:52076".into(),
                credentials: false,
            }
        );
    }
}
