use crate::http::payload::{Payload, TEXT_PLAIN};

/// HTTP status codes the server can answer with.
///
/// This is a closed set; every variant has a fixed reason phrase:
/// - `Ok` (200): handler returned normally
/// - `BadRequest` (400): request could not be parsed
/// - `NotFound` (404): no route matched
/// - `RequestTimeout` (408)
/// - `TooManyRequests` (429)
/// - `InternalServerError` (500): handler failed
/// - `GatewayTimeout` (504)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 408 Request Timeout
    RequestTimeout,
    /// 429 Too Many Requests
    TooManyRequests,
    /// 500 Internal Server Error
    InternalServerError,
    /// 504 Gateway Timeout
    GatewayTimeout,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use sseline::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::TooManyRequests.as_u16(), 429);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::RequestTimeout => 408,
            StatusCode::TooManyRequests => 429,
            StatusCode::InternalServerError => 500,
            StatusCode::GatewayTimeout => 504,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use sseline::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::GatewayTimeout.reason_phrase(), "Gateway Timeout");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::TooManyRequests => "Too Many Requests",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::GatewayTimeout => "Gateway Timeout",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }

    /// Value of the `Connection` header sent with this status.
    pub fn connection_directive(&self) -> &'static str {
        if self.is_success() { "keep-alive" } else { "close" }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers keep insertion order so the wire format is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in the order they will be written
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use sseline::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("2"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header, keeping its original position on replace.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Appends `Content-Length` from the body size unless already present.
    pub fn build(self) -> Response {
        let has_length = self.headers.iter().any(|(k, _)| k == "Content-Length");
        let builder = if has_length {
            self
        } else {
            let len = self.body.len().to_string();
            self.header("Content-Length", len)
        };

        Response {
            status: builder.status,
            headers: builder.headers,
            body: builder.body,
        }
    }
}

impl Response {
    /// A 200 response whose content type and body come from the payload.
    pub fn success(payload: Payload) -> Self {
        let content_type = payload.content_type();
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .header("Connection", StatusCode::Ok.connection_directive())
            .body(payload.into_bytes())
            .build()
    }

    /// An error response with a `"<reason>: <details>"` text body, or just
    /// `"<reason>"` when `details` is empty.
    pub fn error(status: StatusCode, details: &str) -> Self {
        let body = if details.is_empty() {
            status.reason_phrase().to_string()
        } else {
            format!("{}: {}", status.reason_phrase(), details)
        };

        ResponseBuilder::new(status)
            .header("Content-Type", TEXT_PLAIN)
            .header("Connection", status.connection_directive())
            .body(body.into_bytes())
            .build()
    }

    /// The route-miss response: 404, no body, connection closed.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .header("Connection", StatusCode::NotFound.connection_directive())
            .build()
    }

    /// Retrieves a header value by exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
