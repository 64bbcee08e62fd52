//! Response construction.
//!
//! # Responsibilities
//! - Build the static reply for flagged requests
//! - Relay the upstream response to the caller
//!
//! # Design Decisions
//! - Upstream bodies are streamed, never buffered
//! - Status and end-to-end headers pass through untouched
//! - Hop-by-hop headers stripped automatically

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;

use crate::security::headers::strip_hop_by_hop;

/// `200 OK` with a plaintext body.
pub fn rejection(body: &str) -> Response {
    (StatusCode::OK, body.to_owned()).into_response()
}

/// Turn an upstream response into the caller's response.
pub fn relay(upstream: hyper::Response<Incoming>) -> Response {
    let (mut parts, body) = upstream.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
