//! Sticky error taxonomy surfaced through `Parser::errno`.
//!
//! One enum covers both control-flow and diagnostic detail, since the
//! core has only one way to stop (return from `execute`), never a
//! "callback refused, but keep going" path.

use core::fmt;

/// Every way `execute()` can stop parsing a stream permanently.
///
/// Once set on a [`crate::Parser`], the value is sticky: the parser
/// never clears it, and every subsequent `execute()` call is a no-op
/// that returns `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Errno {
    /// No error; parsing may continue.
    Ok,
    CbMessageBegin,
    CbUrl,
    CbHeaderField,
    CbHeaderValue,
    CbHeadersComplete,
    CbBody,
    CbMessageComplete,
    /// The stream ended in the middle of a message with no way to
    /// frame the end (e.g. EOF while reading headers).
    InvalidEofState,
    /// Combined header-region size exceeded `max_header_size`.
    HeaderOverflow,
    /// A byte arrived on a stream already parked in `DEAD`.
    ClosedConnection,
    InvalidVersion,
    InvalidStatus,
    InvalidMethod,
    InvalidUrl,
    InvalidHost,
    InvalidPort,
    InvalidPath,
    InvalidQueryString,
    InvalidFragment,
    LfExpected,
    InvalidHeaderToken,
    InvalidContentLength,
    InvalidChunkSize,
    InvalidConstant,
    InvalidInternalState,
    /// A byte violated a strict-mode-only restriction.
    Strict,
    Unknown,
}

impl Errno {
    /// Short, stable, screaming-snake-case identifier (`"HEADER_OVERFLOW"`).
    pub fn name(self) -> &'static str {
        use Errno::*;
        match self {
            Ok => "OK",
            CbMessageBegin => "CB_message_begin",
            CbUrl => "CB_url",
            CbHeaderField => "CB_header_field",
            CbHeaderValue => "CB_header_value",
            CbHeadersComplete => "CB_headers_complete",
            CbBody => "CB_body",
            CbMessageComplete => "CB_message_complete",
            InvalidEofState => "INVALID_EOF_STATE",
            HeaderOverflow => "HEADER_OVERFLOW",
            ClosedConnection => "CLOSED_CONNECTION",
            InvalidVersion => "INVALID_VERSION",
            InvalidStatus => "INVALID_STATUS",
            InvalidMethod => "INVALID_METHOD",
            InvalidUrl => "INVALID_URL",
            InvalidHost => "INVALID_HOST",
            InvalidPort => "INVALID_PORT",
            InvalidPath => "INVALID_PATH",
            InvalidQueryString => "INVALID_QUERY_STRING",
            InvalidFragment => "INVALID_FRAGMENT",
            LfExpected => "LF_EXPECTED",
            InvalidHeaderToken => "INVALID_HEADER_TOKEN",
            InvalidContentLength => "INVALID_CONTENT_LENGTH",
            InvalidChunkSize => "INVALID_CHUNK_SIZE",
            InvalidConstant => "INVALID_CONSTANT",
            InvalidInternalState => "INVALID_INTERNAL_STATE",
            Strict => "STRICT",
            Unknown => "UNKNOWN",
        }
    }

    /// One-line human-readable description, for logs and error messages.
    pub fn description(self) -> &'static str {
        use Errno::*;
        match self {
            Ok => "success",
            CbMessageBegin => "the message_begin callback failed",
            CbUrl => "the url callback failed",
            CbHeaderField => "the header_field callback failed",
            CbHeaderValue => "the header_value callback failed",
            CbHeadersComplete => "the headers_complete callback failed",
            CbBody => "the body callback failed",
            CbMessageComplete => "the message_complete callback failed",
            InvalidEofState => "stream ended at an unexpected time",
            HeaderOverflow => "too many header bytes seen; overflow detected",
            ClosedConnection => "data received after completion of a close connection",
            InvalidVersion => "invalid HTTP version",
            InvalidStatus => "invalid HTTP status code",
            InvalidMethod => "invalid HTTP method",
            InvalidUrl => "invalid URL",
            InvalidHost => "invalid host",
            InvalidPort => "invalid port",
            InvalidPath => "invalid path",
            InvalidQueryString => "invalid query string",
            InvalidFragment => "invalid fragment",
            LfExpected => "LF character expected",
            InvalidHeaderToken => "invalid character in header",
            InvalidContentLength => "invalid character in content-length header",
            InvalidChunkSize => "invalid character in chunk size header",
            InvalidConstant => "invalid constant string",
            InvalidInternalState => "encountered unexpected internal state",
            Strict => "strict mode assertion failed",
            Unknown => "an unknown error occurred",
        }
    }
}

impl Default for Errno {
    fn default() -> Self {
        Errno::Ok
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.description())
    }
}

/// Free-function form of [`Errno::name`], kept for API parity with the
/// C-shaped `errno_name()`/`errno_description()` pair.
pub fn errno_name(e: Errno) -> &'static str {
    e.name()
}

/// Free-function form of [`Errno::description`].
pub fn errno_description(e: Errno) -> &'static str {
    e.description()
}

/// Internal control-flow alias: state-transition helpers return this and use
/// `?` to bail out to the one cleanup point in `Parser::execute`.
pub(crate) type Result<T> = core::result::Result<T, Errno>;
