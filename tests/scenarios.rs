//! End-to-end scenarios mirroring the documented test matrix: minimal
//! requests/responses, chunked transfer, HEAD skip-body, Upgrade,
//! pipelining, byte-by-byte equivalence, and the header-size guard.

use htp1::{Callbacks, Errno, HttpMethod, MessageType, Parser, ParserConfig};

#[derive(Default)]
struct Recorder {
    events: Vec<&'static str>,
    url: Vec<u8>,
    headers: Vec<(Vec<u8>, Vec<u8>)>,
    cur_field: Vec<u8>,
    cur_value: Vec<u8>,
    in_value: bool,
    body: Vec<u8>,
    skip_body: bool,
}

impl Recorder {
    fn flush_header(&mut self) {
        if !self.cur_field.is_empty() || self.in_value {
            let field = std::mem::take(&mut self.cur_field);
            let value = std::mem::take(&mut self.cur_value);
            self.headers.push((field, value));
            self.in_value = false;
        }
    }
}

impl Callbacks for Recorder {
    fn on_message_begin(&mut self) -> i32 {
        self.events.push("message_begin");
        0
    }

    fn on_url(&mut self, data: &[u8]) -> i32 {
        self.url.extend_from_slice(data);
        0
    }

    fn on_header_field(&mut self, data: &[u8]) -> i32 {
        if self.in_value {
            self.flush_header();
        }
        self.cur_field.extend_from_slice(data);
        0
    }

    fn on_header_value(&mut self, data: &[u8]) -> i32 {
        self.in_value = true;
        self.cur_value.extend_from_slice(data);
        0
    }

    fn on_headers_complete(&mut self) -> i32 {
        self.flush_header();
        self.events.push("headers_complete");
        if self.skip_body {
            1
        } else {
            0
        }
    }

    fn on_body(&mut self, data: &[u8]) -> i32 {
        self.body.extend_from_slice(data);
        0
    }

    fn on_message_complete(&mut self) -> i32 {
        self.events.push("message_complete");
        0
    }
}

const CRLF: &str = "\r\n";

#[test]
fn s1_minimal_get() {
    let input = format!("GET / HTTP/1.1{CRLF}Host: x{CRLF}{CRLF}");
    let mut parser = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    let consumed = parser.execute(input.as_bytes());
    assert_eq!(consumed, input.len());
    assert_eq!(parser.errno(), Errno::Ok);
    assert_eq!(parser.method(), HttpMethod::Get);
    assert_eq!(parser.http_major(), 1);
    assert_eq!(parser.http_minor(), 1);
    assert!(parser.should_keep_alive());

    let rec = parser.callbacks();
    assert_eq!(rec.url, b"/");
    assert_eq!(
        rec.events,
        vec!["message_begin", "headers_complete", "message_complete"]
    );
    assert_eq!(rec.headers, vec![(b"Host".to_vec(), b"x".to_vec())]);
}

#[test]
fn header_name_tolerates_trailing_space_before_colon() {
    let input = format!("GET / HTTP/1.1{CRLF}Content-Length : 0{CRLF}{CRLF}");
    let mut parser = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    let consumed = parser.execute(input.as_bytes());
    assert_eq!(consumed, input.len());
    assert_eq!(parser.errno(), Errno::Ok);

    let rec = parser.callbacks();
    // The trailing space collapses the name match to General, so the
    // length isn't honored as framing — the raw span is still reported
    // byte-exactly, spaces included.
    assert_eq!(rec.headers, vec![(b"Content-Length ".to_vec(), b"0".to_vec())]);
    assert_eq!(parser.content_length(), -1);
}

#[test]
fn s2_chunked_response() {
    let input = format!(
        "HTTP/1.1 200 OK{CRLF}Transfer-Encoding: chunked{CRLF}{CRLF}5{CRLF}hello{CRLF}0{CRLF}{CRLF}"
    );
    let mut parser = Parser::new(MessageType::Response, ParserConfig::default(), Recorder::default());
    let consumed = parser.execute(input.as_bytes());
    assert_eq!(consumed, input.len());
    assert_eq!(parser.errno(), Errno::Ok);
    assert_eq!(parser.status_code(), 200);

    let rec = parser.callbacks();
    assert_eq!(rec.body, b"hello");
    assert_eq!(
        rec.events.iter().filter(|e| **e == "message_complete").count(),
        1
    );
}

#[test]
fn s3_head_response_skips_body() {
    let input = format!("HTTP/1.1 200 OK{CRLF}Content-Length: 10{CRLF}{CRLF}");
    let mut rec = Recorder::default();
    rec.skip_body = true;
    let mut parser = Parser::new(MessageType::Response, ParserConfig::default(), rec);
    let consumed = parser.execute(input.as_bytes());
    assert_eq!(consumed, input.len());
    assert_eq!(parser.errno(), Errno::Ok);

    let rec = parser.callbacks();
    assert!(rec.body.is_empty());
    assert!(rec.events.contains(&"message_complete"));
}

#[test]
fn s4_upgrade_returns_at_header_boundary() {
    let input = format!(
        "GET /chat HTTP/1.1{CRLF}Upgrade: websocket{CRLF}Connection: Upgrade{CRLF}{CRLF}XXX"
    );
    let mut parser = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    let consumed = parser.execute(input.as_bytes());
    let tail_offset = input.len() - 3;
    assert_eq!(consumed, tail_offset);
    assert!(parser.upgrade());
    assert_eq!(parser.errno(), Errno::Ok);
}

#[test]
fn s5_pipelined_requests_on_one_parser() {
    let input = format!(
        "GET /a HTTP/1.1{CRLF}Host: x{CRLF}{CRLF}GET /b HTTP/1.1{CRLF}Host: x{CRLF}{CRLF}"
    );
    let mut parser = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    let consumed = parser.execute(input.as_bytes());
    assert_eq!(consumed, input.len());
    assert_eq!(parser.errno(), Errno::Ok);

    let rec = parser.callbacks();
    assert_eq!(
        rec.events.iter().filter(|e| **e == "message_begin").count(),
        2
    );
    assert_eq!(
        rec.events.iter().filter(|e| **e == "message_complete").count(),
        2
    );
    // The URL span accumulates across both messages since the test
    // recorder never clears it between message_begin calls; check
    // that both spans are present in order.
    assert_eq!(rec.url, b"/a/b");
}

#[test]
fn s6_byte_by_byte_matches_one_shot() {
    let input = format!("GET / HTTP/1.1{CRLF}Host: x{CRLF}{CRLF}");

    let mut whole = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    whole.execute(input.as_bytes());

    let mut split = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    for &b in input.as_bytes() {
        split.execute(&[b]);
    }

    assert_eq!(whole.callbacks().events, split.callbacks().events);
    assert_eq!(whole.callbacks().url, split.callbacks().url);
    assert_eq!(whole.callbacks().headers, split.callbacks().headers);
    assert_eq!(whole.method(), split.method());
    assert_eq!(whole.http_major(), split.http_major());
    assert_eq!(whole.http_minor(), split.http_minor());
}

#[test]
fn s7_header_overflow() {
    let mut input = String::from("GET / HTTP/1.1\r\n");
    input.push_str("X-Pad: ");
    input.push_str(&"a".repeat(90_000));
    input.push_str("\r\n\r\n");

    let mut parser = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    let consumed = parser.execute(input.as_bytes());
    assert_eq!(parser.errno(), Errno::HeaderOverflow);
    assert!(consumed < input.len());
}

#[test]
fn should_keep_alive_formula() {
    // HTTP/1.1 without Connection: close persists.
    let input = format!("GET / HTTP/1.1{CRLF}Host: x{CRLF}{CRLF}");
    let mut p = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    p.execute(input.as_bytes());
    assert!(p.should_keep_alive());

    // HTTP/1.0 without Connection: keep-alive does not persist.
    let input = format!("GET / HTTP/1.0{CRLF}Host: x{CRLF}{CRLF}");
    let mut p = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    p.execute(input.as_bytes());
    assert!(!p.should_keep_alive());

    // HTTP/1.0 with Connection: keep-alive persists.
    let input = format!("GET / HTTP/1.0{CRLF}Connection: keep-alive{CRLF}{CRLF}");
    let mut p = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    p.execute(input.as_bytes());
    assert!(p.should_keep_alive());

    // HTTP/1.1 with Connection: close does not persist.
    let input = format!("GET / HTTP/1.1{CRLF}Connection: close{CRLF}{CRLF}");
    let mut p = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    p.execute(input.as_bytes());
    assert!(!p.should_keep_alive());
}

#[test]
fn sticky_errno_makes_execute_a_no_op() {
    let bad = b"BOGUS / HTTP/1.1\r\n\r\n";
    let mut parser = Parser::new(MessageType::Request, ParserConfig::default(), Recorder::default());
    let consumed = parser.execute(bad);
    assert_ne!(parser.errno(), Errno::Ok);
    assert!(consumed < bad.len());

    let further = parser.execute(b"more data");
    assert_eq!(further, 0);
}
