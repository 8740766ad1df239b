//! CORS development proxy library.
//!
//! Accepts HTTP requests from a browser-based client, rewrites CORS headers,
//! and forwards requests to a single fixed upstream origin, plus a generic
//! image-fetch passthrough endpoint.
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                 CORS PROXY                    │
//!  Client         │  ┌──────┐   ┌─────────┐   ┌───────────────┐  │
//!  ───────────────┼─▶│ cors │──▶│ routing │──▶│    forward    │──┼──▶ Upstream /
//!                 │  │stage │   │  table  │   │ proxy │ fetch │  │    arbitrary URL
//!  ◀──────────────┼──┴──────┴───┴─────────┴───┴───────┴───────┘  │
//!   streamed      │          errors → http::response (JSON)      │
//!                 └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod cors;
pub mod forward;
pub mod health;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
