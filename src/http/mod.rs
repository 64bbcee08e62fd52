//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, gate route)
//!     → request.rs (add request ID)
//!     → [routing::matcher decides: answer locally or forward]
//!     → [routing::director rewrites target]
//!     → response.rs (static reply or relayed upstream response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
