//! Handler capabilities a route can be registered with.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::http::payload::Payload;
use crate::http::request::Request;
use crate::http::sse::EventSender;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Produces one result for a request.
pub type UnaryFn = dyn Fn(Request) -> BoxFuture<Result<Payload, HandlerError>> + Send + Sync;

/// Produces a sequence of events for a request by pushing them into the sender.
pub type StreamFn = dyn Fn(Request, EventSender) -> BoxFuture<anyhow::Result<()>> + Send + Sync;

#[derive(Clone)]
pub enum Handler {
    Unary(Arc<UnaryFn>),
    Stream(Arc<StreamFn>),
}

impl Handler {
    pub fn unary<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Payload, HandlerError>> + Send + 'static,
    {
        let boxed = move |req: Request| -> BoxFuture<Result<Payload, HandlerError>> {
            Box::pin(f(req))
        };
        Handler::Unary(Arc::new(boxed))
    }

    pub fn stream<F, Fut>(f: F) -> Self
    where
        F: Fn(Request, EventSender) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let boxed = move |req: Request, tx: EventSender| -> BoxFuture<anyhow::Result<()>> {
            Box::pin(f(req, tx))
        };
        Handler::Stream(Arc::new(boxed))
    }

    /// Streaming handlers are answered with an SSE handshake.
    pub fn is_sse(&self) -> bool {
        matches!(self, Handler::Stream(_))
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Unary(_) => f.write_str("Handler::Unary"),
            Handler::Stream(_) => f.write_str("Handler::Stream"),
        }
    }
}
