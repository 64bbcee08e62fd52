//! Request flag matching.
//!
//! # Design Decisions
//! - Header name matching is case-insensitive (per HTTP spec)
//! - Only the first value of the header is considered
//! - Any non-empty value matches, including values that are not valid UTF-8

use axum::body::Body;
use axum::http::Request;

/// Matches requests carrying a non-empty value for a given header.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    name: String,
}

impl HeaderMatcher {
    /// Create a new header matcher.
    /// The name is normalized to lowercase.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
        }
    }

    /// Header name this matcher inspects.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the request carries a non-empty value for the header.
    pub fn matches(&self, req: &Request<Body>) -> bool {
        req.headers()
            .get(self.name.as_str())
            .is_some_and(|v| !v.as_bytes().is_empty())
    }
}
