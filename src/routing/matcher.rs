//! Route matching primitives.
//!
//! # Responsibilities
//! - Match request paths exactly or by prefix
//! - Optionally restrict a rule to a single method
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching
//! - Matchers are pure and evaluated in priority order by the route table

use axum::http::Method;
use std::fmt;

/// Trait for matching request paths against a condition.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches one exact path.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.path
    }
}

/// Matches any path under a prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// One entry in the route table: a path condition, an optional method
/// restriction, and the route it selects.
#[derive(Debug)]
pub struct RouteRule {
    pub matcher: Box<dyn Matcher>,
    pub method: Option<Method>,
    pub kind: super::RouteKind,
}

impl RouteRule {
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(required) = &self.method {
            if required != method {
                return false;
            }
        }
        self.matcher.matches(path)
    }
}
