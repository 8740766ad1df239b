//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile the route table from configuration at startup
//! - Look up the matching route for a request
//! - Return the matched route kind or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins, rules evaluated most-specific first
//! - Explicit `None` rather than a silent default route

use axum::http::Method;

use crate::config::ProxyConfig;
use crate::routing::matcher::{ExactPathMatcher, PathPrefixMatcher, RouteRule};

/// The handler class a matched request dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Static status endpoint.
    Health,
    /// Fetch an arbitrary URL from the `url` query parameter.
    DynamicFetch,
    /// Forward verbatim to the configured upstream origin.
    StaticProxy,
}

/// Ordered, immutable route table compiled from configuration.
#[derive(Debug)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Compile the table. Rule order is the matching priority: the exact
    /// health and fetch paths are checked before the proxy prefix, so the
    /// fetch path may live under the prefix without being shadowed.
    pub fn from_config(config: &ProxyConfig) -> Self {
        let mut rules = Vec::new();

        rules.push(RouteRule {
            matcher: Box::new(ExactPathMatcher::new("/health")),
            method: None,
            kind: RouteKind::Health,
        });

        if config.fetch.enabled {
            rules.push(RouteRule {
                matcher: Box::new(ExactPathMatcher::new(config.fetch.path.clone())),
                method: Some(Method::GET),
                kind: RouteKind::DynamicFetch,
            });
        }

        rules.push(RouteRule {
            matcher: Box::new(PathPrefixMatcher::new(config.upstream.path_prefix.clone())),
            method: None,
            kind: RouteKind::StaticProxy,
        });

        Self { rules }
    }

    /// Classify a request. `None` means no route matched and the caller
    /// should answer with a generic 404.
    pub fn match_request(&self, method: &Method, path: &str) -> Option<RouteKind> {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| rule.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::from_config(&ProxyConfig::default())
    }

    #[test]
    fn health_matches_exactly() {
        assert_eq!(
            table().match_request(&Method::GET, "/health"),
            Some(RouteKind::Health)
        );
        assert_eq!(table().match_request(&Method::GET, "/healthz"), None);
    }

    #[test]
    fn fetch_path_wins_over_proxy_prefix() {
        assert_eq!(
            table().match_request(&Method::GET, "/api/proxy"),
            Some(RouteKind::DynamicFetch)
        );
    }

    #[test]
    fn non_get_fetch_path_falls_through_to_proxy() {
        assert_eq!(
            table().match_request(&Method::POST, "/api/proxy"),
            Some(RouteKind::StaticProxy)
        );
    }

    #[test]
    fn prefix_selects_static_proxy() {
        assert_eq!(
            table().match_request(&Method::POST, "/api/v2/adm/user/login_check"),
            Some(RouteKind::StaticProxy)
        );
    }

    #[test]
    fn unmatched_path_is_none() {
        assert_eq!(table().match_request(&Method::GET, "/images/logo.png"), None);
        assert_eq!(table().match_request(&Method::GET, "/"), None);
    }

    #[test]
    fn disabled_fetch_route_is_absent() {
        let mut config = ProxyConfig::default();
        config.fetch.enabled = false;
        let table = RouteTable::from_config(&config);

        assert_eq!(
            table.match_request(&Method::GET, "/api/proxy"),
            Some(RouteKind::StaticProxy)
        );
    }
}
