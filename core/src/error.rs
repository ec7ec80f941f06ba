//! Error types for the task-lists API client.
//!
//! # Design
//! Only failures that happen before or after the round-trip live here.
//! Status codes, timeouts and connection failures are reported through
//! `ApiResponse` so each call site decides how to react to a 401 or a 503.

use thiserror::Error;

/// Local failures raised while encoding a request or decoding a response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
