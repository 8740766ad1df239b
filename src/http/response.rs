//! Error translation: forwarding failures → structured client responses.
//!
//! # Responsibilities
//! - Map every [`ForwardError`] to a status code and a JSON body
//! - Keep the upstream error message verbatim in `details` for diagnostics
//! - Echo the attempted URL for dynamic fetch failures
//!
//! # Design Decisions
//! - Never a bare stack trace, never a silent drop: clients always get
//!   structured JSON, the server always logs the full error
//! - Static proxy and dynamic fetch use distinct `error` labels so the
//!   browser console reads unambiguously

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::forward::ForwardError;

/// JSON body attached to every translated failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Generic 404 for paths no route claims.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "No matching route found").into_response()
}

/// Translate a static proxy failure.
pub fn proxy_failure(err: &ForwardError) -> Response {
    translated(err.status(), "Proxy error", Some(err.to_string()), None)
}

/// Translate a dynamic fetch failure, echoing the attempted URL when the
/// request got far enough to name one.
pub fn fetch_failure(err: &ForwardError, url: Option<&str>) -> Response {
    let (label, details) = match err {
        ForwardError::MissingUrl => ("Missing url parameter", None),
        ForwardError::InvalidUrl { .. } => ("Invalid url parameter", Some(err.to_string())),
        _ => ("Failed to fetch image", Some(err.to_string())),
    };
    translated(err.status(), label, details, url.map(str::to_string))
}

fn translated(
    status: StatusCode,
    error: &'static str,
    details: Option<String>,
    url: Option<String>,
) -> Response {
    (status, Json(ErrorBody { error, details, url })).into_response()
}
