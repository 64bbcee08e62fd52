//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (optional deadline around the round trip)
//!     → On failure: mapped to 502/504, never retried
//! ```

pub mod timeouts;
