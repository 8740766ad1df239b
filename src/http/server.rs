//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the Axum router and wire up middleware (trace, request ID,
//!   timeout backstop, CORS stage)
//! - Dispatch matched requests to the forwarder / fetch / health handlers
//! - Translate forwarding failures through the error translator
//! - Serve with graceful shutdown
//!
//! The per-request pipeline is an explicit ordered list of stages:
//! CORS → route match → handler → error translation. No handler failure
//! escapes as a fault; the listener keeps serving after any single
//! request's error.

use axum::extract::{Request, State};
use axum::http::Uri;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, FetchConfig, ProxyConfig, ValidationError};
use crate::cors::CorsPolicy;
use crate::forward::upstream::InvalidUpstream;
use crate::forward::{fetch, upstream, ForwardError, ProxyClient, UpstreamTarget};
use crate::health;
use crate::http::middleware::cors;
use crate::http::request::{request_id, RequestIdLayer};
use crate::http::response;
use crate::lifecycle;
use crate::routing::{RouteKind, RouteTable};

/// Application state injected into handlers. Everything here is immutable
/// after startup; concurrent requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub policy: Arc<CorsPolicy>,
    pub upstream: Arc<UpstreamTarget>,
    pub client: ProxyClient,
    pub fetch_client: reqwest::Client,
    pub fetch: FetchConfig,
    pub request_deadline: Duration,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, InvalidUpstream> {
        let target = UpstreamTarget::parse(&config.upstream.base_url)?
            .with_change_origin(config.upstream.change_origin);

        Ok(Self {
            routes: Arc::new(RouteTable::from_config(config)),
            policy: Arc::new(CorsPolicy::from_config(&config.cors)),
            upstream: Arc::new(target),
            client: upstream::build_client(),
            fetch_client: fetch::build_client(Duration::from_secs(config.timeouts.connect_secs)),
            fetch: config.fetch.clone(),
            request_deadline: Duration::from_secs(config.timeouts.request_secs),
        })
    }
}

/// HTTP server for the CORS proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let state = AppState::from_config(&config).map_err(|e| {
            ConfigError::Validation(vec![ValidationError::InvalidUpstreamUrl {
                url: e.url,
                reason: e.reason,
            }])
        })?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state.clone())
            .layer(middleware::from_fn_with_state(state, cors::apply))
            // Backstop above the forwarders' own deadlines, which produce
            // the structured timeout errors.
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs + 5,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// Ctrl+C or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(lifecycle::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main dispatch handler: classify the request and hand it to the matching
/// stage. Preflights never get here; the CORS layer answers them first.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match state.routes.match_request(&method, &path) {
        Some(RouteKind::Health) => {
            let image_proxy = state.fetch.enabled.then(|| state.fetch.path.clone());
            Json(health::status_payload(state.upstream.display(), image_proxy)).into_response()
        }
        Some(RouteKind::DynamicFetch) => handle_fetch(&state, &request_id, request.uri()).await,
        Some(RouteKind::StaticProxy) => handle_proxy(&state, &request_id, request).await,
        None => {
            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            response::not_found()
        }
    }
}

/// Dynamic fetch stage: vet the `url` parameter, then stream the bytes.
/// The missing-parameter case short-circuits before any outbound attempt.
async fn handle_fetch(state: &AppState, request_id: &str, uri: &Uri) -> Response {
    let raw = uri.query().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
    });

    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        tracing::warn!(request_id = %request_id, "Fetch request without url parameter");
        return response::fetch_failure(&ForwardError::MissingUrl, None);
    };

    let target = match fetch::parse_target(&raw) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(request_id = %request_id, url = %raw, error = %err, "Rejected fetch url");
            return response::fetch_failure(&err, Some(&raw));
        }
    };

    tracing::debug!(request_id = %request_id, url = %raw, "Fetching image");

    match fetch::fetch(&state.fetch_client, &state.fetch, target).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(request_id = %request_id, url = %raw, error = %err, "Image fetch failed");
            response::fetch_failure(&err, Some(&raw))
        }
    }
}

/// Static proxy stage: one streaming attempt against the fixed upstream.
async fn handle_proxy(state: &AppState, request_id: &str, request: Request) -> Response {
    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        "Proxying request"
    );

    match upstream::forward(&state.client, &state.upstream, state.request_deadline, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(request_id = %request_id, error = %err, "Upstream error");
            response::proxy_failure(&err)
        }
    }
}
