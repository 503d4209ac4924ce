//! Error taxonomy for catalog requests.

use thiserror::Error;

/// Failure of a single catalog request.
///
/// Every variant is terminal for the call that produced it; nothing in the
/// crate retries on its own.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request URL could not be built from the configured base URL.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Connection, timeout or body transfer failure.
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    /// Status outside 200..=299.
    #[error("server error: {0}")]
    Server(u16),
    #[error("no data received")]
    EmptyResponse,
}

impl CatalogError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Server(code) => Some(*code),
            _ => None,
        }
    }
}
