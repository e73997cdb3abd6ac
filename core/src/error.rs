//! Error types for the ActiveCampaign API client.
//!
//! # Design
//! The API reports its own failures inside a successful HTTP response
//! (`result_code: 0`), so only two things can go wrong on the client side: the
//! round-trip itself, and decoding what came back. `InvalidOptions` covers the
//! calls rejected before any I/O happens.

use thiserror::Error;

/// Errors returned by `Client` and its transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS,
    /// timeout, or a failure reading the body).
    #[error("transport failed: {0}")]
    TransportError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body was not a JSON object.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The operation name or request options cannot form a request.
    #[error("invalid request options: {0}")]
    InvalidOptions(String),
}

impl ApiError {
    pub(crate) fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ApiError::TransportError(Box::new(err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DeserializationError(err.to_string())
    }
}
