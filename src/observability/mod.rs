//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; request IDs correlate log lines
//! - Log level configurable via config and the RUST_LOG environment

pub mod logging;
