//! Error types shared across the crate.

use crate::http::response::StatusCode;

/// A request that could not be turned into a [`Request`](crate::http::request::Request).
///
/// Every variant maps to `400 Bad Request`; the `Display` text becomes the
/// details part of the response body.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty request data")]
    Empty,
    #[error("Invalid UTF-8 encoding: {0}")]
    InvalidEncoding(String),
    #[error("Invalid request line: {0}")]
    InvalidRequestLine(String),
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),
}

/// Failure raised by a unary handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Answer with a specific error status and details. A `status` of
    /// [`StatusCode::Ok`] is a handler bug and is answered with a 500.
    #[error("{}: {details}", .status.reason_phrase())]
    Status { status: StatusCode, details: String },

    /// Anything else; answered with `500 Internal Server Error`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn status(status: StatusCode, details: impl Into<String>) -> Self {
        HandlerError::Status {
            status,
            details: details.into(),
        }
    }

    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::status(StatusCode::BadRequest, details)
    }

    pub fn not_found(details: impl Into<String>) -> Self {
        Self::status(StatusCode::NotFound, details)
    }

    pub fn request_timeout(details: impl Into<String>) -> Self {
        Self::status(StatusCode::RequestTimeout, details)
    }

    pub fn too_many_requests(details: impl Into<String>) -> Self {
        Self::status(StatusCode::TooManyRequests, details)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::status(StatusCode::InternalServerError, details)
    }

    pub fn gateway_timeout(details: impl Into<String>) -> Self {
        Self::status(StatusCode::GatewayTimeout, details)
    }
}

/// A route template that failed to compile.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route template {template:?}: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },
}
