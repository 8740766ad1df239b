//! Lifecycle management subsystem.
//!
//! # Design Decisions
//! - One broadcast channel coordinates shutdown across server and tests
//! - SIGINT (Ctrl+C) and the channel are equivalent triggers

pub mod shutdown;

pub use shutdown::{wait, Shutdown};
