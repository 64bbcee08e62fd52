//! Upstream target rewriting.
//!
//! # Responsibilities
//! - Parse the configured upstream address once, at construction
//! - Rewrite scheme and authority of an outbound request to the upstream's
//! - Replace the path with the fixed forwarded path (query is kept)
//! - Point the Host header at the upstream

use std::str::FromStr;

use axum::http::{
    header::HOST,
    request::Parts,
    uri::{Authority, PathAndQuery, Scheme},
    HeaderValue, Uri,
};
use url::Url;

use crate::config::UpstreamConfig;

/// Why an upstream address or path could not be turned into a [`Director`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamConfigError {
    #[error("{address:?} is not a valid URL: {reason}")]
    Unparseable { address: String, reason: String },
    #[error("{0:?} uses an unsupported scheme (only http is supported)")]
    UnsupportedScheme(String),
    #[error("{0:?} has no host")]
    MissingHost(String),
    #[error("{0:?} is not a valid forwarded path")]
    InvalidPath(String),
}

/// Rewrites inbound requests so they target the upstream.
#[derive(Debug, Clone)]
pub struct Director {
    scheme: Scheme,
    authority: Authority,
    path: String,
    host: HeaderValue,
}

impl Director {
    /// Build a director from upstream configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamConfigError> {
        let (scheme, authority) = parse_upstream_address(&config.address)?;

        if !config.path.starts_with('/') || PathAndQuery::from_str(&config.path).is_err() {
            return Err(UpstreamConfigError::InvalidPath(config.path.clone()));
        }

        let host = HeaderValue::from_str(authority.as_str()).map_err(|e| {
            UpstreamConfigError::Unparseable {
                address: config.address.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            scheme,
            authority,
            path: config.path.clone(),
            host,
        })
    }

    /// Upstream host and port, as sent in the Host header.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Fixed path every request is forwarded to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Rewrite `parts` in place to target the upstream.
    pub fn direct(&self, parts: &mut Parts) -> Result<(), axum::http::Error> {
        let path_and_query = match parts.uri.query() {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        };

        parts.uri = Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?;
        parts.headers.insert(HOST, self.host.clone());
        Ok(())
    }
}

/// Parse an upstream base address into scheme and authority.
///
/// Only the scheme, host and port are used; any path on the address is ignored.
pub fn parse_upstream_address(address: &str) -> Result<(Scheme, Authority), UpstreamConfigError> {
    let url = Url::parse(address).map_err(|e| UpstreamConfigError::Unparseable {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" {
        return Err(UpstreamConfigError::UnsupportedScheme(address.to_string()));
    }

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(UpstreamConfigError::MissingHost(address.to_string())),
    };

    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let authority = Authority::from_str(&authority).map_err(|e| UpstreamConfigError::Unparseable {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    Ok((Scheme::HTTP, authority))
}
