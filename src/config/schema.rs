//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a minimal (or empty) config file works.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the CORS development proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single upstream origin that prefix-matched requests forward to.
    pub upstream: UpstreamConfig,

    /// CORS allow-list and credential policy.
    pub cors: CorsConfig,

    /// Generic image-fetch passthrough endpoint.
    pub fetch: FetchConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origin configuration for the static proxy route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Absolute base URL of the upstream (scheme + authority only,
    /// e.g., "http://localhost:3000"). The original request path and query
    /// are appended verbatim.
    pub base_url: String,

    /// Path prefix that selects the static proxy route.
    pub path_prefix: String,

    /// Rewrite the Host header to the upstream authority when forwarding.
    pub change_origin: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            path_prefix: "/api".to_string(),
            change_origin: true,
        }
    }
}

/// CORS policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the proxy from a browser. Exact string match
    /// on scheme + host + port (e.g., "http://localhost:52076").
    pub allowed_origins: Vec<String>,

    /// Send `Access-Control-Allow-Credentials: true` with allowed origins.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_credentials: true,
        }
    }
}

/// Dynamic fetch (image passthrough) endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Expose the fetch endpoint at all.
    pub enabled: bool,

    /// Exact request path that selects the fetch route.
    pub path: String,

    /// Hard deadline for a single fetch attempt, in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/api/proxy".to_string(),
            timeout_secs: 30,
        }
    }
}

impl FetchConfig {
    /// Fetch deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout for outbound fetches, in seconds.
    pub connect_secs: u64,

    /// Ceiling on the time to produce response headers for any request,
    /// in seconds. Must exceed `fetch.timeout_secs` so the fetch route can
    /// report its own, more specific timeout error.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
