//! Handler results, decided once by shape.
//!
//! A [`Payload`] carries the serialized body together with its content type,
//! so the formatter never has to look at the original value again. The same
//! type is used for SSE events, where an empty payload marks the end of the
//! stream.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::fmt::Display;
use std::io;

pub const APPLICATION_JSON: &str = "application/json";
pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Serialized JSON text of a mapping or sequence
    Json(Vec<u8>),
    /// Raw bytes, sent as-is
    Binary(Vec<u8>),
    /// Text, including stringified scalars
    Text(String),
    /// Nothing (`null`)
    Empty,
}

impl Payload {
    /// Serializes `value` as JSON.
    ///
    /// Output uses `", "` and `": "` separators, e.g. `{"count": 0}`.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        to_spaced_json(value).map(Payload::Json)
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Payload::Binary(bytes.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Payload::Text(text.into())
    }

    /// Stringifies any other scalar (numbers, booleans, ...).
    pub fn display(value: impl Display) -> Self {
        Payload::Text(value.to_string())
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Payload::Json(_) => APPLICATION_JSON,
            Payload::Binary(_) => OCTET_STREAM,
            Payload::Text(_) | Payload::Empty => TEXT_PLAIN,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Json(b) | Payload::Binary(b) => b,
            Payload::Text(s) => s.as_bytes(),
            Payload::Empty => &[],
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Json(b) | Payload::Binary(b) => b,
            Payload::Text(s) => s.into_bytes(),
            Payload::Empty => Vec::new(),
        }
    }

    /// True when the serialized form has zero bytes.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<serde_json::Value> for Payload {
    /// Shape dispatch for dynamic values: objects and arrays become JSON,
    /// `null` becomes empty, strings pass through and other scalars are
    /// stringified.
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Payload::Empty,
            Value::String(s) => Payload::Text(s),
            Value::Bool(b) => Payload::display(b),
            Value::Number(n) => Payload::display(n),
            v @ (Value::Array(_) | Value::Object(_)) => match to_spaced_json(&v) {
                Ok(bytes) => Payload::Json(bytes),
                // a Value always serializes
                Err(_) => Payload::Empty,
            },
        }
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Payload::Empty)
    }
}

fn to_spaced_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut ser = serde_json::Serializer::with_formatter(Vec::new(), SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(ser.into_inner())
}

/// Compact JSON with a space after every `,` and `:`.
#[derive(Debug, Clone, Copy, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_uses_spaced_separators() {
        let payload = Payload::json(&json!({"count": 1})).unwrap();
        assert_eq!(payload.as_bytes(), br#"{"count": 1}"#);

        let payload = Payload::json(&json!([1, 2, {"a": []}])).unwrap();
        assert_eq!(payload.as_bytes(), br#"[1, 2, {"a": []}]"#);
    }

    #[test]
    fn value_shapes() {
        assert_eq!(Payload::from(json!(null)), Payload::Empty);
        assert_eq!(Payload::from(json!("hi")), Payload::Text("hi".into()));
        assert_eq!(Payload::from(json!(42)), Payload::Text("42".into()));
        assert_eq!(Payload::from(json!(true)), Payload::Text("true".into()));
        assert_eq!(
            Payload::from(json!({"a": 1})).content_type(),
            APPLICATION_JSON
        );
    }
}
