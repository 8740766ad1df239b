//! Dynamic fetch: stream an arbitrary URL back to the client.
//!
//! # Responsibilities
//! - Validate the caller-supplied URL before any connection is attempted
//! - Issue a GET with a fixed identity and image-biased Accept header
//! - Enforce the fetch deadline and classify every failure
//! - Re-emit the upstream bytes as a stream, never a buffered body
//!
//! # Design Decisions
//! - This endpoint proxies public image URLs, so the response always carries
//!   `Access-Control-Allow-Origin: *` regardless of the general CORS policy
//! - `Content-Type` defaults to `image/jpeg` when the upstream omits it
//! - A non-2xx upstream status is a forwarding failure here, not a
//!   passthrough: the client asked for bytes, not for the upstream's error

use axum::body::Body;
use axum::http::{header, HeaderValue, Response};
use url::Url;

use crate::config::FetchConfig;
use crate::forward::error::ForwardError;

/// Accept header biased toward image formats.
const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/*,*/*;q=0.8";

/// Fixed identifying user agent for outbound fetches.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build the outbound fetch client: identity, connect timeout, TLS.
pub fn build_client(connect_timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(connect_timeout)
        .build()
        // Builder only fails on TLS backend misconfiguration; surface it at
        // startup rather than per request.
        .expect("fetch client construction")
}

/// Parse and vet the caller-supplied URL. Raised before any connection is
/// attempted, so a malformed parameter never counts as a forwarding attempt.
pub fn parse_target(raw: &str) -> Result<Url, ForwardError> {
    let url = Url::parse(raw).map_err(|e| ForwardError::InvalidUrl {
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ForwardError::InvalidUrl {
            reason: format!("unsupported scheme {:?}", url.scheme()),
        });
    }
    Ok(url)
}

/// Fetch `url` and stream the bytes back.
pub async fn fetch(
    client: &reqwest::Client,
    config: &FetchConfig,
    url: Url,
) -> Result<Response<Body>, ForwardError> {
    let timeout = config.timeout();

    let upstream = client
        .get(url)
        .header(header::ACCEPT, IMAGE_ACCEPT)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify(e, timeout))?
        .error_for_status()
        .map_err(|e| classify(e, timeout))?;

    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("image/jpeg"));
    let content_length = upstream.content_length();

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");
    if let Some(length) = content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ForwardError::BadResponse(e.to_string()))
}

fn classify(err: reqwest::Error, timeout: std::time::Duration) -> ForwardError {
    if err.is_timeout() {
        ForwardError::Timeout(timeout)
    } else if err.is_status() {
        ForwardError::BadResponse(err.to_string())
    } else if err.is_connect() || err.is_request() {
        ForwardError::Unreachable(err.to_string())
    } else {
        ForwardError::BadResponse(err.to_string())
    }
}
