//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one request per connection, parsed
//! from a single read, answered with either one buffered response or one
//! chunked Server-Sent-Events stream, after which the connection is closed.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection state machine
//! - **`parser`**: turns the bytes of one read into a [`request::Request`]
//! - **`request`**: request representation
//! - **`payload`**: handler results tagged with their content type
//! - **`response`**: status codes and response construction
//! - **`writer`**: serializes responses and writes them to the client
//! - **`sse`**: event channel, handshake and chunk framing
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← one read, at most read_buffer_size bytes
//!        └──────┬──────┘
//!               ├─ parse error / timeout ─────────────────┐
//!               ▼                                         │
//!        ┌─────────────┐                                  │
//!        │   Routing   │ ─ no match (404) ────────────────┤
//!        └──────┬──────┘                                  │
//!               ├─ unary route ──▶ Unary ──▶ response ────┤
//!               │                                         ▼
//!               │                                  ┌─────────────┐
//!               │                                  │   Writing   │
//!               │                                  └──────┬──────┘
//!               └─ SSE route ──▶ Streaming                │
//!                   (handshake, chunks, 0-chunk)          │
//!                               │                         │
//!                               ▼                         ▼
//!                        ┌──────────────────────────────────┐
//!                        │              Closed              │
//!                        └──────────────────────────────────┘
//! ```

pub mod connection;
pub mod parser;
pub mod payload;
pub mod request;
pub mod response;
pub mod sse;
pub mod writer;
