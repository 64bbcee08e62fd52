//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request on the gate path (headers, path, query)
//!     → matcher.rs (is the flag header set?)
//!         yes → static rejection
//!         no  → director.rs (rewrite scheme, host, path)
//!             → forwarded to upstream
//! ```
//!
//! # Design Decisions
//! - Director built once at startup, immutable at runtime
//! - The caller's path never reaches the upstream; only its query does

pub mod director;
pub mod matcher;

pub use director::{Director, UpstreamConfigError};
pub use matcher::HeaderMatcher;
