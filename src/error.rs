//! Proxy error type and its mapping onto HTTP responses.
//!
//! # Status mapping
//! - Invalid upstream configuration → 500 Internal Server Error
//! - Upstream connect/transport failure → 502 Bad Gateway
//! - Upstream deadline elapsed → 504 Gateway Timeout

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::routing::director::UpstreamConfigError;

/// Everything that can go wrong while forwarding an unflagged request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The configured upstream address is not a usable network location.
    #[error("upstream configuration invalid: {0}")]
    UpstreamConfigInvalid(#[from] UpstreamConfigError),

    /// The upstream could not be reached or the exchange broke off.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The upstream did not answer within the configured deadline.
    #[error("upstream did not respond within {0:?}")]
    UpstreamTimeout(Duration),

    /// The rewritten request target could not be assembled.
    #[error("failed to build forwarded request: {0}")]
    ForwardUri(#[from] axum::http::Error),
}

impl ProxyError {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamConfigInvalid(_) | ProxyError::ForwardUri(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = match self {
            ProxyError::UpstreamConfigInvalid(_) => "Upstream is misconfigured",
            ProxyError::ForwardUri(_) => "Failed to build upstream request",
            ProxyError::Upstream(_) => "Upstream request failed",
            ProxyError::UpstreamTimeout(_) => "Upstream timed out",
        };
        (self.status_code(), message).into_response()
    }
}
