//! Header-name recognizer and header-value recognizer.
//!
//! Both run concurrently with the main field DFA, which still emits
//! the raw `header_field`/`header_value` spans regardless of whether
//! either recognizer stays alive; these only drive the *semantic*
//! side effects (framing flags, `content_length`).

use crate::trie::{Entry, Matcher, Step};

/// Which of the five framing-relevant header names the current field
/// matches, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderName {
    General,
    Connection,
    ContentLength,
    TransferEncoding,
    Upgrade,
}

const NAMES: &[Entry<HeaderName>] = &[
    Entry::new(b"connection", HeaderName::Connection),
    // proxy-connection is an alias of connection for keep-alive/close purposes.
    Entry::new(b"proxy-connection", HeaderName::Connection),
    Entry::new(b"content-length", HeaderName::ContentLength),
    Entry::new(b"transfer-encoding", HeaderName::TransferEncoding),
    Entry::new(b"upgrade", HeaderName::Upgrade),
];

/// Streaming prefix matcher for header field names.
///
/// Every byte is lowercased (`c | 0x20`) before being matched. A byte
/// that isn't a valid `token` byte never reaches this
/// matcher — the caller collapses to `General` itself in that case.
#[derive(Debug, Clone, Copy)]
pub struct HeaderNameRecognizer(Matcher);

impl HeaderNameRecognizer {
    pub fn new() -> Self {
        HeaderNameRecognizer(Matcher::start(NAMES))
    }

    /// Feed one more token byte (already validated against `TOKEN`).
    /// Returns the name recognized so far — `General` while the match
    /// is still alive but ambiguous, and permanently once it dies.
    pub fn advance(&mut self, byte: u8) -> HeaderName {
        let lower = byte | 0x20;
        match self.0.advance(NAMES, lower) {
            Step::Matched(name) => name,
            Step::Continue => HeaderName::General,
            Step::Dead => HeaderName::General,
        }
    }
}

impl Default for HeaderNameRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Which framing-relevant token a header value is being matched
/// against, selected by [`HeaderName`] at `HEADER_VALUE_START`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueToken {
    Chunked,
    KeepAlive,
    Close,
}

const TRANSFER_ENCODING_VALUES: &[Entry<ValueToken>] = &[Entry::new(b"chunked", ValueToken::Chunked)];

const CONNECTION_VALUES: &[Entry<ValueToken>] = &[
    Entry::new(b"keep-alive", ValueToken::KeepAlive),
    Entry::new(b"close", ValueToken::Close),
];

/// Streaming whole-value matcher for the three recognized framing
/// tokens. Only an exact, entire-value match counts: trailing
/// bytes before CRLF that don't belong to the literal kill the match,
/// so `Connection: close, Upgrade` is not detected (documented
/// limitation, see design notes).
#[derive(Debug, Clone, Copy)]
pub enum ValueRecognizer {
    /// Not tracking anything for this value (General header, or
    /// Upgrade/Content-Length which have their own dedicated paths).
    Inactive,
    Matching {
        candidates: &'static [Entry<ValueToken>],
        matcher: Matcher,
    },
    Dead,
}

impl ValueRecognizer {
    pub fn inactive() -> Self {
        ValueRecognizer::Inactive
    }

    /// Start tracking Transfer-Encoding's value against `chunked`.
    pub fn start_transfer_encoding() -> Self {
        ValueRecognizer::Matching {
            candidates: TRANSFER_ENCODING_VALUES,
            matcher: Matcher::start(TRANSFER_ENCODING_VALUES),
        }
    }

    /// Start tracking Connection's value against `keep-alive`/`close`.
    pub fn start_connection() -> Self {
        ValueRecognizer::Matching {
            candidates: CONNECTION_VALUES,
            matcher: Matcher::start(CONNECTION_VALUES),
        }
    }

    /// Feed one value byte (not lowercased by the caller for
    /// Transfer-Encoding/Connection first-byte dispatch — see
    /// `Parser::on_header_value_start`, which lowercases before
    /// calling this).
    pub fn advance(&mut self, byte: u8) {
        if let ValueRecognizer::Matching { candidates, matcher } = self {
            match matcher.advance(candidates, byte | 0x20) {
                Step::Matched(_) | Step::Continue => {}
                Step::Dead => *self = ValueRecognizer::Dead,
            }
        }
    }

    /// The token matched so far, valid to read once the value's
    /// terminating CRLF has been reached.
    pub fn matched(&self) -> Option<ValueToken> {
        if let ValueRecognizer::Matching { candidates, matcher } = self {
            if let Step::Matched(tok) = matcher.peek(candidates) {
                return Some(tok);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_name(s: &str) -> HeaderName {
        let mut r = HeaderNameRecognizer::new();
        let mut last = HeaderName::General;
        for &b in s.as_bytes() {
            last = r.advance(b);
        }
        last
    }

    #[test]
    fn recognizes_all_five_framing_names() {
        assert_eq!(feed_name("connection"), HeaderName::Connection);
        assert_eq!(feed_name("proxy-connection"), HeaderName::Connection);
        assert_eq!(feed_name("content-length"), HeaderName::ContentLength);
        assert_eq!(feed_name("transfer-encoding"), HeaderName::TransferEncoding);
        assert_eq!(feed_name("upgrade"), HeaderName::Upgrade);
    }

    #[test]
    fn unrelated_name_collapses_to_general() {
        assert_eq!(feed_name("host"), HeaderName::General);
        assert_eq!(feed_name("accept-encoding"), HeaderName::General);
    }

    #[test]
    fn connection_value_matches_keep_alive_and_close() {
        let mut r = ValueRecognizer::start_connection();
        for &b in b"keep-alive" {
            r.advance(b);
        }
        assert_eq!(r.matched(), Some(ValueToken::KeepAlive));

        let mut r = ValueRecognizer::start_connection();
        for &b in b"close" {
            r.advance(b);
        }
        assert_eq!(r.matched(), Some(ValueToken::Close));
    }

    #[test]
    fn transfer_encoding_matches_chunked_only() {
        let mut r = ValueRecognizer::start_transfer_encoding();
        for &b in b"chunked" {
            r.advance(b);
        }
        assert_eq!(r.matched(), Some(ValueToken::Chunked));
    }

    #[test]
    fn comma_separated_value_does_not_match_whole_value_token() {
        // Documented limitation (design notes): "close, Upgrade" is
        // not recognized as Connection: close.
        let mut r = ValueRecognizer::start_connection();
        for &b in b"close, Upgrade" {
            r.advance(b);
        }
        assert_eq!(r.matched(), None);
    }
}
