//! Static proxy forwarding to the configured upstream origin.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the upstream scheme + authority
//! - Copy method, headers, and body stream verbatim (minus hop-by-hop)
//! - Stream the upstream response back without buffering
//!
//! # Design Decisions
//! - The original path and query are preserved; the upstream base supplies
//!   only scheme and authority
//! - Host is rewritten to the upstream authority when `change_origin` is set
//! - Bodies flow through hyper's streaming `Incoming`/`Body` types, so
//!   backpressure propagates client ⇄ upstream without unbounded buffering

use axum::body::Body;
use axum::http::uri::{Authority, Parts, PathAndQuery, Scheme};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request, Response, Uri};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::{Client, Error as ClientError};
use thiserror::Error;

use crate::forward::error::ForwardError;

/// Outbound client used for static proxying. Streams request and response
/// bodies; TLS so the upstream base may be https.
pub type ProxyClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Build the shared outbound client.
pub fn build_client() -> ProxyClient {
    Client::builder(hyper_util::rt::TokioExecutor::new()).build(HttpsConnector::new())
}

/// The configured upstream origin, parsed once at startup.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    scheme: Scheme,
    authority: Authority,
    display: String,
    change_origin: bool,
}

/// The upstream base URL could not be parsed into scheme + authority.
#[derive(Debug, Error)]
#[error("invalid upstream url {url:?}: {reason}")]
pub struct InvalidUpstream {
    pub url: String,
    pub reason: String,
}

impl UpstreamTarget {
    /// Parse a base URL of the form `scheme://host[:port]`.
    pub fn parse(base_url: &str) -> Result<Self, InvalidUpstream> {
        let invalid = |reason: &str| InvalidUpstream {
            url: base_url.to_string(),
            reason: reason.to_string(),
        };

        let uri: Uri = base_url.trim_end_matches('/').parse().map_err(
            |e: axum::http::uri::InvalidUri| invalid(&e.to_string()),
        )?;
        let parts = uri.into_parts();

        let scheme = parts.scheme.ok_or_else(|| invalid("missing scheme"))?;
        if scheme != Scheme::HTTP && scheme != Scheme::HTTPS {
            return Err(invalid("scheme must be http or https"));
        }
        let authority = parts.authority.ok_or_else(|| invalid("missing host"))?;
        if let Some(pq) = parts.path_and_query {
            if pq.path() != "/" && !pq.path().is_empty() || pq.query().is_some() {
                return Err(invalid("base url must not carry a path or query"));
            }
        }

        Ok(Self {
            display: format!("{}://{}", scheme, authority),
            scheme,
            authority,
            change_origin: true,
        })
    }

    pub fn with_change_origin(mut self, change_origin: bool) -> Self {
        self.change_origin = change_origin;
        self
    }

    /// Human-readable origin, e.g. for the health payload and logs.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Rebase a request URI onto this origin, keeping path and query.
    fn rebase(&self, uri: &Uri) -> Result<Uri, ForwardError> {
        let mut parts = Parts::default();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        // from_parts requires a path once a scheme is present.
        parts.path_and_query = Some(
            uri.path_and_query()
                .cloned()
                .unwrap_or_else(|| PathAndQuery::from_static("/")),
        );
        Uri::from_parts(parts).map_err(|e| ForwardError::BadResponse(e.to_string()))
    }
}

/// Headers that are connection-scoped and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name) || name.as_str() == "keep-alive"
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let doomed: Vec<HeaderName> = headers
        .keys()
        .filter(|name| is_hop_by_hop(name))
        .cloned()
        .collect();
    for name in doomed {
        headers.remove(name);
    }
}

/// Forward a request to the upstream origin, streaming both bodies.
///
/// A single attempt bounded by `deadline` (until response headers arrive):
/// transport failures come back as [`ForwardError`], and any upstream status
/// (2xx or not) is passed through verbatim.
pub async fn forward(
    client: &ProxyClient,
    target: &UpstreamTarget,
    deadline: std::time::Duration,
    request: Request<Body>,
) -> Result<Response<Body>, ForwardError> {
    let (parts, body) = request.into_parts();
    let uri = target.rebase(&parts.uri)?;

    let mut outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .body(body)
        .map_err(|e| ForwardError::BadResponse(e.to_string()))?;

    for (name, value) in parts.headers.iter() {
        if is_hop_by_hop(name) {
            continue;
        }
        if name == header::HOST && target.change_origin {
            continue;
        }
        // append, not insert: multi-valued headers arrive one entry per value
        outbound.headers_mut().append(name.clone(), value.clone());
    }
    if target.change_origin {
        let host = HeaderValue::from_str(target.authority.as_str())
            .map_err(|e| ForwardError::BadResponse(e.to_string()))?;
        outbound.headers_mut().insert(header::HOST, host);
    }

    let response = tokio::time::timeout(deadline, client.request(outbound))
        .await
        .map_err(|_| ForwardError::Timeout(deadline))?
        .map_err(classify)?;

    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Ok(Response::from_parts(parts, Body::new(body)))
}

fn classify(err: ClientError) -> ForwardError {
    if err.is_connect() {
        ForwardError::Unreachable(err.to_string())
    } else {
        ForwardError::BadResponse(err.to_string())
    }
}
