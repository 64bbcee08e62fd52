//! Header-gated reverse proxy.
//!
//! One route. Requests that carry the flag header are answered locally with a
//! fixed plaintext body; all others are rewritten to a fixed upstream path and
//! the upstream's response is streamed back unchanged.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::schema::GateConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
