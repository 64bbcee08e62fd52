//! Observability subsystem.
//!
//! Structured logs only: every event carries the request ID so the path of
//! a single request through gate and upstream can be followed.

pub mod logging;
