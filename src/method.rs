//! HTTP request method enum and streaming recognizer.
//!
//! Includes the common verbs plus a handful of WebDAV/SIP-adjacent
//! methods (M-SEARCH, NOTIFY, SUBSCRIBE, ...) recognized by the same
//! trie as everything else.

use crate::trie::{Entry, Matcher, Step};

/// HTTP request methods recognized at the start of the request line.
///
/// `Unknown` is the initial value before any bytes are matched, and
/// the final value if the method literal doesn't match anything
/// recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HttpMethod {
    Unknown,
    Delete,
    Get,
    Head,
    Post,
    Put,
    Connect,
    Options,
    Trace,
    Copy,
    Lock,
    Mkcol,
    Move,
    Propfind,
    Proppatch,
    Unlock,
    Report,
    Mkactivity,
    Checkout,
    Merge,
    MSearch,
    Notify,
    Subscribe,
    Unsubscribe,
    Patch,
}

impl HttpMethod {
    /// The canonical uppercase literal, as it appears on the wire.
    pub fn name(self) -> &'static str {
        use HttpMethod::*;
        match self {
            Unknown => "UNKNOWN",
            Delete => "DELETE",
            Get => "GET",
            Head => "HEAD",
            Post => "POST",
            Put => "PUT",
            Connect => "CONNECT",
            Options => "OPTIONS",
            Trace => "TRACE",
            Copy => "COPY",
            Lock => "LOCK",
            Mkcol => "MKCOL",
            Move => "MOVE",
            Propfind => "PROPFIND",
            Proppatch => "PROPPATCH",
            Unlock => "UNLOCK",
            Report => "REPORT",
            Mkactivity => "MKACTIVITY",
            Checkout => "CHECKOUT",
            Merge => "MERGE",
            MSearch => "M-SEARCH",
            Notify => "NOTIFY",
            Subscribe => "SUBSCRIBE",
            Unsubscribe => "UNSUBSCRIBE",
            Patch => "PATCH",
        }
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        HttpMethod::Unknown
    }
}

/// Free-function form of [`HttpMethod::name`], kept for API parity
/// with a C-shaped `method_name()` helper.
pub fn method_name(m: HttpMethod) -> &'static str {
    m.name()
}

const METHODS: &[Entry<HttpMethod>] = &[
    Entry::new(b"DELETE", HttpMethod::Delete),
    Entry::new(b"GET", HttpMethod::Get),
    Entry::new(b"HEAD", HttpMethod::Head),
    Entry::new(b"POST", HttpMethod::Post),
    Entry::new(b"PUT", HttpMethod::Put),
    Entry::new(b"CONNECT", HttpMethod::Connect),
    Entry::new(b"OPTIONS", HttpMethod::Options),
    Entry::new(b"TRACE", HttpMethod::Trace),
    Entry::new(b"COPY", HttpMethod::Copy),
    Entry::new(b"LOCK", HttpMethod::Lock),
    Entry::new(b"MKCOL", HttpMethod::Mkcol),
    Entry::new(b"MOVE", HttpMethod::Move),
    Entry::new(b"PROPFIND", HttpMethod::Propfind),
    Entry::new(b"PROPPATCH", HttpMethod::Proppatch),
    Entry::new(b"UNLOCK", HttpMethod::Unlock),
    Entry::new(b"REPORT", HttpMethod::Report),
    Entry::new(b"MKACTIVITY", HttpMethod::Mkactivity),
    Entry::new(b"CHECKOUT", HttpMethod::Checkout),
    Entry::new(b"MERGE", HttpMethod::Merge),
    Entry::new(b"M-SEARCH", HttpMethod::MSearch),
    Entry::new(b"NOTIFY", HttpMethod::Notify),
    Entry::new(b"SUBSCRIBE", HttpMethod::Subscribe),
    Entry::new(b"UNSUBSCRIBE", HttpMethod::Unsubscribe),
    Entry::new(b"PATCH", HttpMethod::Patch),
];

/// Streaming recognizer for the request-line method token.
///
/// Fed one byte at a time starting at the first byte of the method;
/// the space terminating the token must land on [`MethodMatch::Matched`]
/// or the request fails with `INVALID_METHOD`.
#[derive(Debug, Clone, Copy)]
pub struct MethodRecognizer(Matcher);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodMatch {
    Continue,
    Matched(HttpMethod),
    Dead,
}

impl MethodRecognizer {
    pub fn new() -> Self {
        MethodRecognizer(Matcher::start(METHODS))
    }

    pub fn advance(&mut self, byte: u8) -> MethodMatch {
        match self.0.advance(METHODS, byte) {
            Step::Continue => MethodMatch::Continue,
            Step::Matched(m) => MethodMatch::Matched(m),
            Step::Dead => MethodMatch::Dead,
        }
    }
}

impl Default for MethodRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(s: &str) -> MethodMatch {
        let mut r = MethodRecognizer::new();
        let mut last = MethodMatch::Dead;
        for &b in s.as_bytes() {
            last = r.advance(b);
        }
        last
    }

    #[test]
    fn recognizes_get() {
        assert_eq!(feed("GET"), MethodMatch::Matched(HttpMethod::Get));
    }

    #[test]
    fn recognizes_connect_checkout_copy_fork() {
        assert_eq!(feed("CONNECT"), MethodMatch::Matched(HttpMethod::Connect));
        assert_eq!(feed("CHECKOUT"), MethodMatch::Matched(HttpMethod::Checkout));
        assert_eq!(feed("COPY"), MethodMatch::Matched(HttpMethod::Copy));
    }

    #[test]
    fn recognizes_m_family_fork() {
        assert_eq!(feed("MKCOL"), MethodMatch::Matched(HttpMethod::Mkcol));
        assert_eq!(feed("MOVE"), MethodMatch::Matched(HttpMethod::Move));
        assert_eq!(feed("MERGE"), MethodMatch::Matched(HttpMethod::Merge));
        assert_eq!(feed("M-SEARCH"), MethodMatch::Matched(HttpMethod::MSearch));
        assert_eq!(feed("MKACTIVITY"), MethodMatch::Matched(HttpMethod::Mkactivity));
    }

    #[test]
    fn recognizes_p_family_fork() {
        assert_eq!(feed("POST"), MethodMatch::Matched(HttpMethod::Post));
        assert_eq!(feed("PROPFIND"), MethodMatch::Matched(HttpMethod::Propfind));
        assert_eq!(feed("PROPPATCH"), MethodMatch::Matched(HttpMethod::Proppatch));
        assert_eq!(feed("PUT"), MethodMatch::Matched(HttpMethod::Put));
        assert_eq!(feed("PATCH"), MethodMatch::Matched(HttpMethod::Patch));
    }

    #[test]
    fn recognizes_u_family_fork() {
        assert_eq!(feed("UNLOCK"), MethodMatch::Matched(HttpMethod::Unlock));
        assert_eq!(feed("UNSUBSCRIBE"), MethodMatch::Matched(HttpMethod::Unsubscribe));
    }

    #[test]
    fn unknown_method_dies() {
        let mut r = MethodRecognizer::new();
        assert_eq!(r.advance(b'Z'), MethodMatch::Dead);
    }
}
