//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Matched request
//!     → upstream.rs (STATIC_PROXY: rebase URI, stream through)
//!     → fetch.rs    (DYNAMIC_FETCH: GET the literal url parameter)
//!     → Ok(Response)       (streamed, never buffered)
//!     → Err(ForwardError)  (consumed by the error translator)
//! ```
//!
//! # Design Decisions
//! - One attempt per request; retry policy is out of scope
//! - Every transport failure becomes a ForwardError value, never a panic
//!   or an unhandled fault; the listener keeps serving

pub mod error;
pub mod fetch;
pub mod upstream;

pub use error::ForwardError;
pub use upstream::{ProxyClient, UpstreamTarget};
