//! Sseline - a small HTTP/1.1 server with Server-Sent Events streaming
//!
//! Core library: request parsing, route table, response formatting,
//! chunked SSE framing and the per-connection state machine.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod routing;
pub mod server;

pub use error::{HandlerError, ParseError, RouteError};
pub use handler::Handler;
pub use http::payload::Payload;
pub use http::request::Request;
pub use http::response::StatusCode;
pub use http::sse::EventSender;
pub use routing::{Route, RouteTable};
