//! Error types for the endpoint execution core.
//!
//! # Design
//! Each pipeline stage owns an error type: binding fails with
//! `ParameterError`, building with `RequestError`, execution with
//! `TransportError` and decoding with `DecodeError`. `ApiError` unifies them
//! so the stages compose with `?`. Facades wrap an `ApiError` in a
//! `ZohoError`, which adds one line of human-readable context and keeps the
//! stage error reachable through `source()`.

use thiserror::Error;

/// A required parameter (or required group) was absent after binding.
///
/// Always raised before any network I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("missing required parameter `{name}`")]
    Missing { name: String },

    #[error("at least one of [{}] is required", .names.join(", "))]
    MissingOneOf { names: Vec<String> },
}

/// The bound parameters could not be rendered into an HTTP request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid url template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The credential could not be obtained from the authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no access token configured (set {0})")]
    MissingToken(&'static str),

    #[error("credential unavailable: {0}")]
    Unavailable(String),
}

/// The transport could not complete the round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("network error: {0}")]
pub struct NetworkError(pub String);

/// Failures of the execute stage.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Non-2xx status with a body. `message` is Zoho's error message when the
    /// body carries one, otherwise the raw body.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: String,
    },

    #[error("HTTP {status} with empty response body")]
    EmptyResponse { status: u16 },
}

/// The response payload did not decode into the declared type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not JSON at all.
    #[error("malformed response body for {expected}: {message}")]
    Malformed {
        expected: &'static str,
        message: String,
    },

    /// The body is JSON but does not have the shape of the declared type.
    #[error("unexpected response shape for {expected}: {message}")]
    UnexpectedShape {
        expected: &'static str,
        message: String,
    },
}

/// Any failure of the bind → build → execute → decode pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Transport(TransportError::Auth(e))
    }
}

impl From<NetworkError> for ApiError {
    fn from(e: NetworkError) -> Self {
        ApiError::Transport(TransportError::Network(e))
    }
}

/// Error returned by facade operations.
///
/// Displays as `"<context>: <cause>"`, e.g.
/// `Failed to retrieve availability: HTTP 500: boom`.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct ZohoError {
    module: &'static str,
    operation: &'static str,
    context: String,
    #[source]
    source: ApiError,
}

impl ZohoError {
    pub fn new(
        module: &'static str,
        operation: &'static str,
        context: impl Into<String>,
        source: ApiError,
    ) -> Self {
        Self {
            module,
            operation,
            context: context.into(),
            source,
        }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// The stage error this failure wraps.
    pub fn api_error(&self) -> &ApiError {
        &self.source
    }

    pub fn into_api_error(self) -> ApiError {
        self.source
    }

    /// HTTP status of a non-2xx response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match &self.source {
            ApiError::Transport(TransportError::Status { status, .. })
            | ApiError::Transport(TransportError::EmptyResponse { status }) => Some(*status),
            _ => None,
        }
    }
}
