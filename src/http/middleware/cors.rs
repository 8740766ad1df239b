//! CORS middleware stage.
//!
//! First stage of the per-request pipeline: answers preflights before routing
//! runs, and decorates every other response according to the policy. A
//! disallowed origin is never rejected here: the response simply carries no
//! allow header and the browser enforces the block.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::cors::CorsDecision;
use crate::http::server::AppState;

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

pub async fn apply(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let decision = state.policy.evaluate(origin.as_deref());

    // Preflights are answered immediately, without reaching the forwarder.
    if request.method() == Method::OPTIONS {
        return preflight(&decision, request.headers());
    }

    let mut response = next.run(request).await;
    attach(response.headers_mut(), &decision);
    response
}

/// 204 preflight answer. Allow headers only when the origin passed the
/// policy; otherwise a bare 204 the browser will treat as a block.
fn preflight(decision: &CorsDecision, request_headers: &HeaderMap) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::VARY,
        HeaderValue::from_static("Origin, Access-Control-Request-Headers"),
    );

    if let CorsDecision::Allow { origin, credentials } = decision {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        if let Some(requested) = request_headers.get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        if *credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }

    response
}

/// Decorate a non-preflight response. A handler that already set an
/// allow-origin header (the fetch route's unconditional `*`) wins.
fn attach(headers: &mut HeaderMap, decision: &CorsDecision) {
    if let CorsDecision::Allow { origin, credentials } = decision {
        if !headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
            if let Ok(value) = HeaderValue::from_str(origin) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                if *credentials {
                    headers.insert(
                        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                        HeaderValue::from_static("true"),
                    );
                }
            }
        }
    }
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}
