use std::collections::HashMap;

/// Represents a parsed HTTP request from a client.
///
/// Built once per connection from the first socket read and handed to the
/// matching handler by value. `path_params` stays empty until a route
/// template has matched the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method exactly as sent (`GET`, `POST`, ...); case-sensitive
    pub method: String,
    /// The request path without the query string (e.g. "/counter")
    pub path: String,
    /// HTTP version token from the request line (typically "HTTP/1.1")
    pub version: String,
    /// Query string parameters; a repeated key keeps its last value
    pub query: HashMap<String, String>,
    /// Named captures from the matched route template
    pub path_params: HashMap<String, String>,
    /// Request headers as key-value pairs, names kept as sent
    pub headers: HashMap<String, String>,
    /// Parsed `Content-Length`, if the header was present
    pub content_length: Option<usize>,
    /// `Content-Type` passed through verbatim
    pub content_type: Option<String>,
    /// Everything after the blank line, if non-empty
    pub body: Option<String>,
}

/// Builder for constructing Request objects.
///
/// Mostly useful for exercising handlers without going through the parser.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<String>,
    path: Option<String>,
    version: Option<String>,
    query: HashMap<String, String>,
    path_params: HashMap<String, String>,
    headers: HashMap<String, String>,
    body: Option<String>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Fails when method or path were never set. `Content-Length` and
    /// `Content-Type` are derived from the headers the same way the parser does.
    pub fn build(self) -> Result<Request, &'static str> {
        let content_length = match self.headers.get("Content-Length") {
            Some(v) => Some(v.parse().map_err(|_| "invalid Content-Length")?),
            None => None,
        };
        let content_type = self.headers.get("Content-Type").cloned();

        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            query: self.query,
            path_params: self.path_params,
            headers: self.headers,
            content_length,
            content_type,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by its exact name.
    ///
    /// Header names are stored as sent, so the lookup is case-sensitive.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Looks up a query string parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(|v| v.as_str())
    }

    /// Looks up a value captured by the route template, e.g. `id` for `/items/{id}`.
    pub fn path_param(&self, key: &str) -> Option<&str> {
        self.path_params.get(key).map(|v| v.as_str())
    }
}
