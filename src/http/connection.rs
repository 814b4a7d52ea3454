use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::error::HandlerError;
use crate::handler::{Handler, StreamFn, UnaryFn};
use crate::http::parser::parse_http_request;
use crate::http::payload::Payload;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::sse::{self, EventStream};
use crate::http::writer::ResponseWriter;
use crate::routing::RouteTable;

pub const DEFAULT_READ_BUFFER_SIZE: usize = 8192;
pub const DEFAULT_EVENT_BUFFER: usize = 16;

/// Per-connection knobs, derived from [`Config`](crate::config::Config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Size of the one and only read performed on the socket
    pub read_buffer_size: usize,
    /// Bound on that read; `None` waits forever
    pub read_timeout: Option<Duration>,
    /// Capacity of the SSE event channel
    pub event_buffer: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            read_timeout: None,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Serves exactly one request on an accepted stream, then closes it.
pub struct Connection<S> {
    stream: S,
    routes: Arc<RouteTable>,
    settings: ConnectionSettings,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Routing(Request),
    Unary(Arc<UnaryFn>, Request),
    Streaming(Arc<StreamFn>, Request),
    Writing(ResponseWriter),
    Closed,
}

/// Why the event loop stopped pulling from the channel.
enum StreamEnd {
    /// Every sender is gone
    Exhausted,
    /// An event serialized to zero bytes
    EmptyEvent,
}

enum Pumped {
    Event(Option<Payload>),
    PeerRead(std::io::Result<usize>),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, routes: Arc<RouteTable>, settings: ConnectionSettings) -> Self {
        Self {
            stream,
            routes,
            settings,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the state machine to `Closed`, then shuts the stream down.
    ///
    /// Errors are I/O failures on the socket itself; every request-level
    /// failure has already been answered with a response by then.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        // flush whatever is buffered, the peer may already be gone
        if let Err(e) = self.stream.shutdown().await {
            debug!("shutdown failed: {}", e);
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_bytes().await? {
                    Some(bytes) => match parse_http_request(&bytes) {
                        Ok(request) => ConnectionState::Routing(request),
                        Err(e) => {
                            info!(error = %e, status = 400, "Rejected malformed request");
                            let response =
                                Response::error(StatusCode::BadRequest, &e.to_string());
                            ConnectionState::Writing(ResponseWriter::new(&response))
                        }
                    },
                    None => {
                        info!(status = 408, "Timed out waiting for request data");
                        let response = Response::error(
                            StatusCode::RequestTimeout,
                            "Timed out waiting for request data",
                        );
                        ConnectionState::Writing(ResponseWriter::new(&response))
                    }
                },

                ConnectionState::Routing(mut request) => {
                    match self.routes.find(&request.method, &request.path) {
                        Some(found) => {
                            request.path_params = found.path_params;
                            match &found.route.handler {
                                Handler::Unary(f) => ConnectionState::Unary(Arc::clone(f), request),
                                Handler::Stream(f) => {
                                    ConnectionState::Streaming(Arc::clone(f), request)
                                }
                            }
                        }
                        None => {
                            info!(
                                method = %request.method,
                                path = %request.path,
                                status = 404,
                                "No route matched"
                            );
                            ConnectionState::Writing(ResponseWriter::new(&Response::not_found()))
                        }
                    }
                }

                ConnectionState::Unary(handler, request) => {
                    let method = request.method.clone();
                    let path = request.path.clone();
                    let response = dispatch_unary(handler, request).await;

                    info!(
                        method = %method,
                        path = %path,
                        status = response.status.as_u16(),
                        "Request handled"
                    );
                    ConnectionState::Writing(ResponseWriter::new(&response))
                }

                ConnectionState::Streaming(handler, request) => {
                    info!(method = %request.method, path = %request.path, "Opening event stream");
                    self.stream_events(handler, request).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// One read of at most `read_buffer_size` bytes. `None` means the
    /// configured read timeout expired first.
    async fn read_bytes(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; self.settings.read_buffer_size];

        let n = match self.settings.read_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.stream.read(&mut buf)).await {
                Ok(read) => read?,
                Err(_) => return Ok(None),
            },
            None => self.stream.read(&mut buf).await?,
        };

        buf.truncate(n);
        debug!(bytes = n, "Read request data");
        Ok(Some(buf))
    }

    /// Handshake, then one chunk per event, then the terminal chunk.
    async fn stream_events(
        &mut self,
        handler: Arc<StreamFn>,
        request: Request,
    ) -> anyhow::Result<()> {
        ResponseWriter::from_bytes(sse::HANDSHAKE)
            .write_to_stream(&mut self.stream)
            .await?;

        let (sender, mut events) = sse::channel(self.settings.event_buffer);
        let producer = tokio::spawn(handler(request, sender));

        let pumped = self.pump_events(&mut events).await;
        events.close();

        match pumped {
            Err(e) => {
                // peer is gone, stop producing
                producer.abort();
                return Err(e);
            }
            Ok(StreamEnd::EmptyEvent) => {
                debug!("Event stream ended by empty event");
                producer.abort();
            }
            Ok(StreamEnd::Exhausted) => match producer.await {
                Ok(Ok(())) => debug!("Event stream exhausted"),
                Ok(Err(e)) => {
                    warn!(error = %format!("{e:#}"), "SSE producer failed, ending stream")
                }
                Err(e) => {
                    warn!(error = %join_error_message(e), "SSE producer aborted, ending stream")
                }
            },
        }

        self.stream.write_all(sse::TERMINAL_CHUNK).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Forwards events until the channel ends. Also watches the read half so
    /// a peer that hangs up between events is noticed without a failed write.
    async fn pump_events(&mut self, events: &mut EventStream) -> anyhow::Result<StreamEnd> {
        let mut sent = 0usize;
        let mut discard = [0u8; 512];

        loop {
            let next = tokio::select! {
                biased;
                event = events.next() => Pumped::Event(event),
                read = self.stream.read(&mut discard) => Pumped::PeerRead(read),
            };

            match next {
                Pumped::Event(None) => return Ok(StreamEnd::Exhausted),
                Pumped::Event(Some(event)) => {
                    let Some(chunk) = sse::encode_event(&event) else {
                        debug!(events = sent, "Received end-of-stream event");
                        return Ok(StreamEnd::EmptyEvent);
                    };
                    self.stream.write_all(&chunk).await?;
                    self.stream.flush().await?;
                    sent += 1;
                }
                Pumped::PeerRead(Ok(0)) => {
                    debug!(events = sent, "Peer closed during event stream");
                    return Err(anyhow::anyhow!("peer closed the connection mid-stream"));
                }
                // nothing more is expected from the client; drop stray bytes
                Pumped::PeerRead(Ok(n)) => debug!(bytes = n, "Ignoring data after request"),
                Pumped::PeerRead(Err(e)) => return Err(e.into()),
            }
        }
    }
}

/// Runs the handler on its own task so a panic turns into a 500 instead of
/// taking the connection down with it.
pub async fn dispatch_unary(handler: Arc<UnaryFn>, request: Request) -> Response {
    match tokio::spawn(handler(request)).await {
        Ok(Ok(payload)) => Response::success(payload),
        Ok(Err(HandlerError::Status { status, details })) if status.is_success() => {
            warn!(details = %details, "Handler raised 200 as an error status");
            Response::error(StatusCode::InternalServerError, &details)
        }
        Ok(Err(HandlerError::Status { status, details })) => Response::error(status, &details),
        Ok(Err(HandlerError::Other(e))) => {
            warn!(error = %format!("{e:#}"), "Handler failed");
            Response::error(StatusCode::InternalServerError, &e.to_string())
        }
        Err(e) => {
            let message = join_error_message(e);
            warn!(error = %message, "Handler panicked");
            Response::error(StatusCode::InternalServerError, &message)
        }
    }
}

fn join_error_message(e: JoinError) -> String {
    if e.is_panic() {
        panic_message(e.into_panic())
    } else {
        e.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
