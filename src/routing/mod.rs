//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (evaluate path condition)
//!     → Return: RouteKind or None (→ 404)
//!
//! Route Compilation (at startup):
//!     ProxyConfig
//!     → health + fetch (exact) before proxy prefix
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (exact + prefix matching only)
//! - First match wins (most specific rules first)

pub mod matcher;
pub mod router;

pub use router::{RouteKind, RouteTable};
