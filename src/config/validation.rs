//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and paths before the server binds
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{uri::PathAndQuery, HeaderName};

use crate::config::schema::GateConfig;
use crate::routing::director::parse_upstream_address;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),
    #[error("gate.path {0:?} must be a literal absolute path")]
    GatePath(String),
    #[error("gate.header {0:?} is not a valid header name")]
    HeaderName(String),
    #[error("upstream.address: {0}")]
    UpstreamAddress(String),
    #[error("upstream.path {0:?} must be an absolute path")]
    UpstreamPath(String),
    #[error("upstream.timeout_secs must be greater than 0")]
    ZeroTimeout,
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if !is_literal_route(&config.gate.path) {
        errors.push(ValidationError::GatePath(config.gate.path.clone()));
    }

    if HeaderName::from_bytes(config.gate.header.as_bytes()).is_err() {
        errors.push(ValidationError::HeaderName(config.gate.header.clone()));
    }

    if let Err(e) = parse_upstream_address(&config.upstream.address) {
        errors.push(ValidationError::UpstreamAddress(e.to_string()));
    }

    let path_ok = config.upstream.path.starts_with('/')
        && config.upstream.path.parse::<PathAndQuery>().is_ok();
    if !path_ok {
        errors.push(ValidationError::UpstreamPath(config.upstream.path.clone()));
    }

    if config.upstream.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True if axum can mount `path` as a plain, capture-free route.
///
/// Braces and `*` would become captures or wildcards, and a segment starting
/// with `:` is rejected by the router at construction.
fn is_literal_route(path: &str) -> bool {
    path.starts_with('/')
        && !path.contains(&['{', '}', '*', '?'][..])
        && !path.split('/').any(|segment| segment.starts_with(':'))
        && path.parse::<PathAndQuery>().is_ok()
}
