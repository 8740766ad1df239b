//! Forwarding failure taxonomy.
//!
//! Every way an outbound attempt can fail is caught at the forwarding layer
//! and surfaced as one of these variants; nothing propagates as an unhandled
//! fault that could take down the listener. Client-input defects (missing or
//! malformed `url` parameter) are part of the same enum but map to 400 and
//! are raised before any connection is attempted.

use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single forwarding attempt. No retries: one attempt either
/// succeeds or becomes one of these.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The fetch route was called without a `url` query parameter.
    #[error("missing url parameter")]
    MissingUrl,

    /// The `url` parameter was present but not an absolute http(s) URL.
    #[error("invalid url parameter: {reason}")]
    InvalidUrl { reason: String },

    /// Connection refused, DNS failure, TLS failure: the target could not
    /// be reached at all.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    /// The attempt exceeded its deadline and was aborted.
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    /// The target answered, but with a non-2xx status or an undecodable
    /// response.
    #[error("bad upstream response: {0}")]
    BadResponse(String),
}

impl ForwardError {
    /// Client-visible status for this failure. Everything that is not the
    /// caller's fault is a plain 500 with a structured body.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::MissingUrl | ForwardError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            ForwardError::Unreachable(_)
            | ForwardError::Timeout(_)
            | ForwardError::BadResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for defects in the client's request rather than upstream faults.
    pub fn is_client_error(&self) -> bool {
        self.status() == StatusCode::BAD_REQUEST
    }
}
