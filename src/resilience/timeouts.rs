//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap the upstream round trip with an optional deadline
//! - Cancel the pending call cleanly on timeout
//!
//! # Design Decisions
//! - No deadline unless one is configured
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::error::ProxyError;

/// Await `fut`, giving up after `deadline` if one is set.
pub async fn with_deadline<F, T, E>(deadline: Option<Duration>, fut: F) -> Result<T, ProxyError>
where
    F: Future<Output = Result<T, E>>,
    ProxyError: From<E>,
{
    match deadline {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result.map_err(ProxyError::from),
            Err(_) => Err(ProxyError::UpstreamTimeout(limit)),
        },
        None => fut.await.map_err(ProxyError::from),
    }
}
