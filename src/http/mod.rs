//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch)
//!     → request.rs (add request ID)
//!     → middleware/cors.rs (preflight short-circuit, response headers)
//!     → [routing table classifies] → forward / fetch / health
//!     → response.rs (translate failures to structured JSON)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
