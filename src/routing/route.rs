use std::collections::HashMap;
use std::future::Future;

use crate::error::{HandlerError, RouteError};
use crate::handler::Handler;
use crate::http::payload::Payload;
use crate::http::request::Request;
use crate::http::sse::EventSender;
use crate::routing::template::PathTemplate;

/// One entry of the route table: method, compiled template and handler.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: String,
    pub template: PathTemplate,
    pub handler: Handler,
}

impl Route {
    pub fn new(
        template: &str,
        method: impl Into<String>,
        handler: Handler,
    ) -> Result<Self, RouteError> {
        Ok(Self {
            method: method.into(),
            template: PathTemplate::compile(template)?,
            handler,
        })
    }

    /// Registers a handler that answers with a single response.
    ///
    /// ```
    /// # use sseline::{Route, Request, Payload, HandlerError};
    /// async fn hello(_req: Request) -> Result<Payload, HandlerError> {
    ///     Ok(Payload::text("hi"))
    /// }
    /// let route = Route::unary("/hello", "GET", hello).unwrap();
    /// assert!(!route.is_sse());
    /// ```
    pub fn unary<F, Fut>(
        template: &str,
        method: impl Into<String>,
        f: F,
    ) -> Result<Self, RouteError>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Payload, HandlerError>> + Send + 'static,
    {
        Self::new(template, method, Handler::unary(f))
    }

    /// Registers a handler that answers with an SSE stream.
    pub fn stream<F, Fut>(
        template: &str,
        method: impl Into<String>,
        f: F,
    ) -> Result<Self, RouteError>
    where
        F: Fn(Request, EventSender) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::new(template, method, Handler::stream(f))
    }

    pub fn is_sse(&self) -> bool {
        self.handler.is_sse()
    }

    /// Path parameters if both method and path match.
    pub fn matches(&self, method: &str, path: &str) -> Option<HashMap<String, String>> {
        if self.method != method {
            return None;
        }
        self.template.captures(path)
    }
}
