//! Server-Sent Events over chunked transfer encoding.
//!
//! A streaming handler runs as its own task and pushes [`Payload`]s through
//! an [`EventSender`]. The connection owns the matching [`EventStream`],
//! frames every payload as `data: <payload>\n\n` and wraps each frame in one
//! HTTP chunk:
//!
//! ```text
//! HTTP/1.1 200 OK                 ← handshake, written once
//! Content-Type: text/event-stream
//! ...
//!
//! e\r\n                           ← hex length of the frame
//! data: hello\n\n\r\n
//! 0\r\n\r\n                       ← terminal chunk
//! ```
//!
//! A payload with zero serialized bytes ends the stream without a chunk of
//! its own.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::sync::mpsc;

use crate::http::payload::Payload;

/// Headers that open every event stream. No body follows directly.
pub const HANDSHAKE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: text/event-stream\r\n\
Cache-Control: no-cache\r\n\
Connection: keep-alive\r\n\
Transfer-Encoding: chunked\r\n\
\r\n";

/// Zero-length chunk closing the chunked body.
pub const TERMINAL_CHUNK: &[u8] = b"0\r\n\r\n";

/// Frames one event as a chunk, or `None` for the end-of-stream marker.
pub fn encode_event(payload: &Payload) -> Option<Bytes> {
    let data = payload.as_bytes();
    if data.is_empty() {
        return None;
    }

    let frame_len = b"data: ".len() + data.len() + b"\n\n".len();
    let size_line = format!("{frame_len:x}\r\n");

    let mut chunk = BytesMut::with_capacity(size_line.len() + frame_len + 2);
    chunk.put_slice(size_line.as_bytes());
    chunk.put_slice(b"data: ");
    chunk.put_slice(data);
    chunk.put_slice(b"\n\n");
    chunk.put_slice(b"\r\n");

    Some(chunk.freeze())
}

/// Returned by [`EventSender::send`] once the connection stopped listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event stream closed by the connection")]
pub struct StreamClosed;

/// Producer half handed to streaming handlers.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Payload>,
}

impl EventSender {
    /// Queues one event, waiting while the channel is full.
    ///
    /// Fails once the peer has gone away or the stream has ended, which is
    /// the producer's cue to stop.
    pub async fn send(&self, event: impl Into<Payload>) -> Result<(), StreamClosed> {
        self.tx.send(event.into()).await.map_err(|_| StreamClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, drained by the connection.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<Payload>,
}

impl EventStream {
    /// Next event, or `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<Payload> {
        self.rx.recv().await
    }

    /// Stops accepting events; pending `send`s fail with [`StreamClosed`].
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Creates a bounded event channel.
pub fn channel(capacity: usize) -> (EventSender, EventStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (EventSender { tx }, EventStream { rx })
}
