use sseline::error::ParseError;
use sseline::http::parser::parse_http_request;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert!(parsed.query.is_empty());
    assert!(parsed.path_params.is_empty());
    assert_eq!(parsed.body, None);
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\nContent-Type: text/plain\r\n\r\nhello";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, "POST");
    assert_eq!(parsed.path, "/api");
    assert_eq!(parsed.content_length, Some(5));
    assert_eq!(parsed.content_type.as_deref(), Some("text/plain"));
    assert_eq!(parsed.body.as_deref(), Some("hello"));
}

#[test]
fn test_parse_multiline_body_keeps_line_terminators() {
    let req = b"POST /api HTTP/1.1\r\n\r\nline one\r\nline two";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.body.as_deref(), Some("line one\r\nline two"));
}

#[test]
fn test_parse_without_blank_line_has_no_body() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert_eq!(parsed.body, None);
}

#[test]
fn test_parse_multiple_headers_trimmed() {
    let req = b"GET /path HTTP/1.1\r\nHost:   example.com  \r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert_eq!(parsed.headers.get("User-Agent").unwrap(), "test-client");
    assert_eq!(parsed.headers.get("Accept").unwrap(), "*/*");
}

#[test]
fn test_parse_header_value_with_colon() {
    let req = b"GET / HTTP/1.1\r\nHost: localhost:8000\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "localhost:8000");
}

#[test]
fn test_parse_header_line_without_colon_is_ignored() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\nHost: a\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.headers.get("Host").unwrap(), "a");
}

#[test]
fn test_parse_path_and_query_string() {
    let req = b"GET /search?q=rust&page=2 HTTP/1.1\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/search");
    assert_eq!(parsed.query.get("q").unwrap(), "rust");
    assert_eq!(parsed.query.get("page").unwrap(), "2");
}

#[test]
fn test_parse_query_repeated_key_keeps_last() {
    let req = b"GET /search?tag=a&tag=b&tag=c HTTP/1.1\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.query.len(), 1);
    assert_eq!(parsed.query.get("tag").unwrap(), "c");
}

#[test]
fn test_parse_query_fragment_without_equals_is_ignored() {
    let req = b"GET /x?verbose&a=1=2 HTTP/1.1\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert!(!parsed.query.contains_key("verbose"));
    assert_eq!(parsed.query.get("a").unwrap(), "1=2");
}

#[test]
fn test_parse_query_is_not_percent_decoded() {
    let req = b"GET /x?name=a%20b HTTP/1.1\r\n\r\n";
    let parsed = parse_http_request(req).unwrap();

    assert_eq!(parsed.query.get("name").unwrap(), "a%20b");
}

#[test]
fn test_parse_method_is_case_sensitive_text() {
    let parsed = parse_http_request(b"get / HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.method, "get");

    let parsed = parse_http_request(b"BREW /pot HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.method, "BREW");
}

#[test]
fn test_parse_empty_input() {
    let result = parse_http_request(b"");

    assert_eq!(result, Err(ParseError::Empty));
    assert_eq!(ParseError::Empty.to_string(), "Empty request data");
}

#[test]
fn test_parse_invalid_utf8() {
    let result = parse_http_request(b"GET /\xff HTTP/1.1\r\n\r\n");

    match result {
        Err(ParseError::InvalidEncoding(_)) => {}
        other => panic!("expected encoding error, got {:?}", other),
    }
}

#[test]
fn test_parse_request_line_with_too_few_tokens() {
    let result = parse_http_request(b"GET /\r\nHost: a\r\n\r\n");

    let err = result.unwrap_err();
    assert_eq!(err, ParseError::InvalidRequestLine("GET /".to_string()));
    assert!(err.to_string().contains("GET /"));
}

#[test]
fn test_parse_invalid_content_length() {
    let result = parse_http_request(b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n");

    assert_eq!(
        result,
        Err(ParseError::InvalidContentLength("ten".to_string()))
    );
}

#[test]
fn test_parse_content_length_absent() {
    let parsed = parse_http_request(b"GET / HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(parsed.content_length, None);
    assert_eq!(parsed.content_type, None);
}
