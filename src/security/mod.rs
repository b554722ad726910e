//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed destination URL:
//!     → access_control.rs (destination allow/block lists)
//! Parsed Origin / X-Requested-With URL (if present):
//!     → access_control.rs (origin allow/block lists)
//!     → Pass to upstream fetch
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any check failure
//! - Lists are built once from config and never mutated

pub mod access_control;

pub use access_control::{AccessPolicy, HostPolicy};
