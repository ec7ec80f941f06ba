//! HTTP request and response values.
//!
//! # Design
//! `HttpRequest` is plain data produced by the `TasksApi::build_*` methods,
//! so request construction can be checked without a network. `ApiResponse`
//! is the envelope every operation hands back: status, headers and raw body
//! are passed through untouched, and `problem` only labels what happened.
//! Nothing in this module branches on a status code to decide success for
//! the caller.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// HTTP method for a request. The API only needs these three verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the relative path plus query string exactly as the operation
/// interpolated it; `url` is that path joined onto the client's base URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Coarse label for the outcome of a round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    /// Status 400 to 499.
    ClientError,
    /// Status 500 to 599.
    ServerError,
    /// Any other non-2xx status.
    UnknownError,
    /// No response arrived within the configured timeout.
    TimeoutError,
    /// The host could not be resolved or refused the connection.
    ConnectionError,
    /// Any other transport failure.
    NetworkError,
}

impl Problem {
    /// Label a received status code. `None` for 2xx.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400..=499 => Some(Problem::ClientError),
            500..=599 => Some(Problem::ServerError),
            _ => Some(Problem::UnknownError),
        }
    }
}

/// Whatever came back from one request.
///
/// `status` is `None` when no response was received at all; `error` then
/// carries the transport's description of the failure.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub ok: bool,
    pub problem: Option<Problem>,
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub duration: Duration,
    pub error: Option<String>,
}

impl ApiResponse {
    /// Envelope for a response that was received, whatever its status.
    pub fn received(
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
        duration: Duration,
    ) -> Self {
        let problem = Problem::from_status(status);
        Self {
            ok: problem.is_none(),
            problem,
            status: Some(status),
            headers,
            body,
            duration,
            error: None,
        }
    }

    /// Envelope for a request that never produced a response.
    pub fn failed(problem: Problem, error: String, duration: Duration) -> Self {
        Self {
            ok: false,
            problem: Some(problem),
            status: None,
            headers: Vec::new(),
            body: String::new(),
            duration,
            error: Some(error),
        }
    }

    /// Envelope for a response whose status and headers arrived but whose
    /// body could not be read to the end. The status is kept; `error`
    /// describes the failed read.
    pub fn interrupted(
        status: u16,
        headers: Vec<(String, String)>,
        problem: Problem,
        error: String,
        duration: Duration,
    ) -> Self {
        Self {
            ok: false,
            problem: Some(problem),
            status: Some(status),
            headers,
            body: String::new(),
            duration,
            error: Some(error),
        }
    }

    /// Decode the body as `T`, regardless of status. Error bodies from the
    /// backend are JSON too, so callers may read them the same way.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
