use crate::error::ParseError;
use crate::http::request::Request;
use std::collections::HashMap;

const LINE_TERMINATOR: &str = "\r\n";

/// Parses the bytes of a single read into a [`Request`].
///
/// The whole buffer is treated as the request: there is no notion of an
/// incomplete message, whatever arrived in the one read is what gets parsed.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let text =
        std::str::from_utf8(buf).map_err(|e| ParseError::InvalidEncoding(e.to_string()))?;

    let mut lines = text.split(LINE_TERMINATOR);

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();

    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequestLine(request_line.to_string()));
    };

    let (path, query) = match target.split_once('?') {
        Some((path, query_string)) => (path, parse_query(query_string)),
        None => (target, HashMap::new()),
    };

    // Headers, up to the first blank line
    let mut headers = HashMap::new();
    let mut saw_blank_line = false;

    for line in lines.by_ref() {
        if line.is_empty() {
            saw_blank_line = true;
            break;
        }

        // no folding, no validation: lines without a colon are skipped
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    // Body
    let body = if saw_blank_line {
        let rest = lines.collect::<Vec<_>>().join(LINE_TERMINATOR);
        (!rest.is_empty()).then_some(rest)
    } else {
        None
    };

    let content_length = headers
        .get("Content-Length")
        .map(|v: &String| {
            v.parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength(v.clone()))
        })
        .transpose()?;
    let content_type = headers.get("Content-Type").cloned();

    Ok(Request {
        method: method.to_string(),
        path: path.to_string(),
        version: version.to_string(),
        query,
        path_params: HashMap::new(),
        headers,
        content_length,
        content_type,
        body,
    })
}

/// Splits `a=1&b=2` into a map. Fragments without `=` are dropped and a
/// repeated key keeps its last value. Values are not percent-decoded.
pub fn parse_query(query_string: &str) -> HashMap<String, String> {
    query_string
        .split('&')
        .filter_map(|fragment| fragment.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
