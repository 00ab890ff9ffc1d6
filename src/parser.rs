//! The message state machine: `Parser::execute`, the headers-complete
//! decision tree, body framing, and keep-alive policy.
//!
//! A hand-written byte-at-a-time DFA: nothing here reads ahead, and
//! nothing allocates. Every state transition is driven by exactly one
//! input byte (or zero, for the handful of epsilon `Reprocess` steps),
//! so the parser can suspend and resume at any byte boundary across
//! calls to `execute`.

use log::{debug, trace, warn};

use crate::callbacks::Callbacks;
use crate::config::ParserConfig;
use crate::error::{Errno, Result as PResult};
use crate::flags::Flags;
use crate::header::{HeaderName, HeaderNameRecognizer, ValueRecognizer, ValueToken};
use crate::method::{HttpMethod, MethodMatch, MethodRecognizer};
use crate::state::State;
use crate::tables;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Which side of the connection a [`Parser`] is decoding.
///
/// `Either` collapses to `Request` or `Response` on the first
/// non-whitespace byte of the first message and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Request,
    Response,
    Either,
}

/// Outcome of consuming one byte.
enum StepOutcome {
    /// Byte consumed, advance to the next one.
    Continue,
    /// Re-run the byte against the (just-updated) state without
    /// advancing — used for epsilon transitions such as a type
    /// collapsing out of `START_REQ_OR_RES`.
    Reprocess,
    /// Stop immediately; `usize` is the total consumed count
    /// (an Upgrade/CONNECT boundary, per S4).
    Paused(usize),
}

/// One incremental HTTP/1.x message parser, bound to one logical byte
/// stream and reused across pipelined messages on it.
pub struct Parser<C: Callbacks> {
    cfg: ParserConfig,
    callbacks: C,

    ty: MessageType,
    state: State,
    header_state: HeaderName,
    flags: Flags,
    nread: u32,
    content_length: i64,
    chunk_size: u64,
    http_major: u16,
    http_minor: u16,
    status_code: u16,
    method: HttpMethod,
    errno: Errno,
    upgrade: bool,

    url_mark: Option<usize>,
    header_field_mark: Option<usize>,
    header_value_mark: Option<usize>,

    method_recognizer: MethodRecognizer,
    header_name_recognizer: HeaderNameRecognizer,
    value_recognizer: ValueRecognizer,
}

impl<C: Callbacks> Parser<C> {
    pub fn new(ty: MessageType, cfg: ParserConfig, callbacks: C) -> Self {
        let state = match ty {
            MessageType::Request => State::StartReq,
            MessageType::Response => State::StartRes,
            MessageType::Either => State::StartReqOrRes,
        };
        Parser {
            cfg,
            callbacks,
            ty,
            state,
            header_state: HeaderName::General,
            flags: Flags::empty(),
            nread: 0,
            content_length: -1,
            chunk_size: 0,
            http_major: 1,
            http_minor: 1,
            status_code: 0,
            method: HttpMethod::Unknown,
            errno: Errno::Ok,
            upgrade: false,
            url_mark: None,
            header_field_mark: None,
            header_value_mark: None,
            method_recognizer: MethodRecognizer::new(),
            header_name_recognizer: HeaderNameRecognizer::new(),
            value_recognizer: ValueRecognizer::inactive(),
        }
    }

    pub fn errno(&self) -> Errno {
        self.errno
    }

    pub fn upgrade(&self) -> bool {
        self.upgrade
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn http_major(&self) -> u16 {
        self.http_major
    }

    pub fn http_minor(&self) -> u16 {
        self.http_minor
    }

    pub fn content_length(&self) -> i64 {
        self.content_length
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    /// `(HTTP/1.1+ ∧ ¬CLOSE) ∨ (HTTP/1.0 ∧ KEEP_ALIVE)`.
    pub fn should_keep_alive(&self) -> bool {
        if self.http_major >= 1 && self.http_minor >= 1 {
            !self.flags.contains(Flags::CLOSE)
        } else {
            self.flags.contains(Flags::KEEP_ALIVE)
        }
    }

    /// Feed `data` to the parser. `data.is_empty()` signals EOF from
    /// the transport. Returns the number of bytes consumed; if this
    /// is less than `data.len()`, check [`Parser::errno`] and
    /// [`Parser::upgrade`] to see why.
    pub fn execute(&mut self, data: &[u8]) -> usize {
        if self.errno != Errno::Ok {
            return 0;
        }
        if data.is_empty() {
            return self.handle_eof();
        }

        self.reopen_marks();

        let mut i = 0usize;
        'outer: while i < data.len() {
            match self.state {
                State::BodyIdentity => match self.consume_identity_body(data, &mut i) {
                    Ok(()) => continue 'outer,
                    Err(e) => {
                        self.errno = e;
                        return i;
                    }
                },
                State::BodyIdentityEof => {
                    let remaining = &data[i..];
                    if !remaining.is_empty() && self.callbacks.on_body(remaining) != 0 {
                        self.errno = Errno::CbBody;
                        return i;
                    }
                    return data.len();
                }
                State::ChunkData => match self.consume_chunk_data(data, &mut i) {
                    Ok(()) => continue 'outer,
                    Err(e) => {
                        self.errno = e;
                        return i;
                    }
                },
                _ => {}
            }

            let b = data[i];
            loop {
                match self.step(data, i, b) {
                    Ok(StepOutcome::Continue) => {
                        i += 1;
                        continue 'outer;
                    }
                    Ok(StepOutcome::Reprocess) => continue,
                    Ok(StepOutcome::Paused(consumed)) => return consumed,
                    Err(e) => {
                        warn!("parse error {:?} at offset {}", e, i);
                        self.errno = e;
                        return i;
                    }
                }
            }
        }

        if let Err(e) = self.flush_open_marks(data, data.len()) {
            self.errno = e;
        }
        data.len()
    }

    fn handle_eof(&mut self) -> usize {
        match self.state {
            State::BodyIdentityEof => {
                if self.callbacks.on_message_complete() != 0 {
                    self.errno = Errno::CbMessageComplete;
                    return 0;
                }
                self.transition_new_message();
            }
            State::StartReq | State::StartRes | State::StartReqOrRes | State::Dead => {}
            _ => {
                self.errno = Errno::InvalidEofState;
            }
        }
        0
    }

    fn reopen_marks(&mut self) {
        if self.state.is_url_state() && self.url_mark.is_none() {
            self.url_mark = Some(0);
        }
        if (self.state == State::HeaderField || self.state == State::HeaderFieldWs)
            && self.header_field_mark.is_none()
        {
            self.header_field_mark = Some(0);
        }
        if self.state == State::HeaderValue && self.header_value_mark.is_none() {
            self.header_value_mark = Some(0);
        }
    }

    fn flush_open_marks(&mut self, data: &[u8], end: usize) -> PResult<()> {
        self.emit_url(data, end)?;
        self.emit_header_field(data, end)?;
        self.emit_header_value(data, end)?;
        Ok(())
    }

    fn emit_url(&mut self, data: &[u8], end: usize) -> PResult<()> {
        if let Some(mark) = self.url_mark.take() {
            if end > mark && self.callbacks.on_url(&data[mark..end]) != 0 {
                return Err(Errno::CbUrl);
            }
        }
        Ok(())
    }

    fn emit_header_field(&mut self, data: &[u8], end: usize) -> PResult<()> {
        if let Some(mark) = self.header_field_mark.take() {
            if end > mark && self.callbacks.on_header_field(&data[mark..end]) != 0 {
                return Err(Errno::CbHeaderField);
            }
        }
        Ok(())
    }

    fn emit_header_value(&mut self, data: &[u8], end: usize) -> PResult<()> {
        if let Some(mark) = self.header_value_mark.take() {
            if end > mark && self.callbacks.on_header_value(&data[mark..end]) != 0 {
                return Err(Errno::CbHeaderValue);
            }
        }
        Ok(())
    }

    /// Consumes as much of the identity body as is available in this
    /// buffer. Returns `Ok(true)` if the caller should re-check the
    /// outer state (message may have completed).
    fn consume_identity_body(&mut self, data: &[u8], i: &mut usize) -> PResult<()> {
        let remaining = &data[*i..];
        let take = core::cmp::min(remaining.len(), self.content_length as usize);
        if take > 0 {
            if self.callbacks.on_body(&remaining[..take]) != 0 {
                return Err(Errno::CbBody);
            }
            self.content_length -= take as i64;
            *i += take;
        }
        if self.content_length == 0 {
            if self.callbacks.on_message_complete() != 0 {
                return Err(Errno::CbMessageComplete);
            }
            self.transition_new_message();
        }
        Ok(())
    }

    fn consume_chunk_data(&mut self, data: &[u8], i: &mut usize) -> PResult<()> {
        let remaining = &data[*i..];
        let take = core::cmp::min(remaining.len() as u64, self.chunk_size) as usize;
        if take > 0 {
            if self.callbacks.on_body(&remaining[..take]) != 0 {
                return Err(Errno::CbBody);
            }
            self.chunk_size -= take as u64;
            *i += take;
        }
        if self.chunk_size == 0 {
            self.state = State::ChunkDataAlmostDone;
        }
        Ok(())
    }

    fn url_char_ok(&self, b: u8) -> bool {
        tables::NORMAL_URL_CHAR[b as usize] && (b < 0x80 || !self.cfg.strict)
    }

    fn host_char_ok(&self, b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || (b == b'_' && !self.cfg.strict)
    }

    fn url_initial_state(&self, first: u8) -> State {
        if self.method == HttpMethod::Connect {
            State::UrlHost
        } else if first == b'/' {
            State::UrlPath
        } else {
            State::UrlSchema
        }
    }

    fn begin_message(&mut self) -> PResult<()> {
        trace!("message_begin");
        if self.callbacks.on_message_begin() != 0 {
            return Err(Errno::CbMessageBegin);
        }
        Ok(())
    }

    fn start_header_value(&mut self) {
        match self.header_state {
            HeaderName::Upgrade => {
                self.flags.insert(Flags::UPGRADE);
                self.value_recognizer = ValueRecognizer::inactive();
            }
            HeaderName::TransferEncoding => {
                self.value_recognizer = ValueRecognizer::start_transfer_encoding();
            }
            HeaderName::Connection => {
                self.value_recognizer = ValueRecognizer::start_connection();
            }
            HeaderName::ContentLength => {
                self.content_length = 0;
                self.value_recognizer = ValueRecognizer::inactive();
            }
            HeaderName::General => {
                self.value_recognizer = ValueRecognizer::inactive();
            }
        }
    }

    fn accumulate_content_length_digit(&mut self, digit: u8) -> PResult<()> {
        let d = (digit - b'0') as i64;
        match self.content_length.checked_mul(10).and_then(|v| v.checked_add(d)) {
            Some(v) => {
                self.content_length = v;
                Ok(())
            }
            None => Err(Errno::InvalidContentLength),
        }
    }

    fn finalize_value_flags(&mut self) {
        match self.value_recognizer.matched() {
            Some(ValueToken::Chunked) => self.flags.insert(Flags::CHUNKED),
            Some(ValueToken::KeepAlive) => self.flags.insert(Flags::KEEP_ALIVE),
            Some(ValueToken::Close) => self.flags.insert(Flags::CLOSE),
            None => {}
        }
    }

    fn transition_new_message(&mut self) {
        let keep = self.should_keep_alive();
        debug!("message_complete, should_keep_alive={}", keep);
        self.flags.reset();
        self.content_length = -1;
        self.method = HttpMethod::Unknown;
        self.status_code = 0;
        self.header_state = HeaderName::General;
        self.nread = 0;
        self.upgrade = false;
        if self.cfg.strict && !keep {
            self.state = State::Dead;
        } else {
            self.state = match self.ty {
                MessageType::Request => State::StartReq,
                MessageType::Response => State::StartRes,
                MessageType::Either => State::StartReqOrRes,
            };
        }
    }

    fn finish_headers(&mut self, i: usize) -> PResult<StepOutcome> {
        self.nread = 0;

        if self.flags.contains(Flags::TRAILING) {
            if self.callbacks.on_message_complete() != 0 {
                return Err(Errno::CbMessageComplete);
            }
            self.transition_new_message();
            return Ok(StepOutcome::Continue);
        }

        if self.flags.contains(Flags::UPGRADE) || self.method == HttpMethod::Connect {
            self.upgrade = true;
            if self.callbacks.on_headers_complete() != 0 {
                return Err(Errno::CbHeadersComplete);
            }
            if self.callbacks.on_message_complete() != 0 {
                return Err(Errno::CbMessageComplete);
            }
            return Ok(StepOutcome::Paused(i + 1));
        }

        match self.callbacks.on_headers_complete() {
            0 => {}
            1 => self.flags.insert(Flags::SKIPBODY),
            _ => return Err(Errno::CbHeadersComplete),
        }

        if self.flags.contains(Flags::SKIPBODY) {
            if self.callbacks.on_message_complete() != 0 {
                return Err(Errno::CbMessageComplete);
            }
            self.transition_new_message();
        } else if self.flags.contains(Flags::CHUNKED) {
            self.state = State::ChunkSizeStart;
        } else if self.content_length == 0 {
            if self.callbacks.on_message_complete() != 0 {
                return Err(Errno::CbMessageComplete);
            }
            self.transition_new_message();
        } else if self.content_length > 0 {
            self.state = State::BodyIdentity;
        } else if matches!(self.ty, MessageType::Request) || self.should_keep_alive() {
            if self.callbacks.on_message_complete() != 0 {
                return Err(Errno::CbMessageComplete);
            }
            self.transition_new_message();
        } else {
            self.state = State::BodyIdentityEof;
        }
        Ok(StepOutcome::Continue)
    }

    #[allow(clippy::too_many_lines)]
    fn step(&mut self, data: &[u8], i: usize, b: u8) -> PResult<StepOutcome> {
        if self.state.counts_toward_header_overflow() {
            self.nread += 1;
            if self.nread > self.cfg.max_header_size {
                return Err(Errno::HeaderOverflow);
            }
        }

        use State::*;
        match self.state {
            StartReqOrRes => {
                if b == CR || b == LF {
                    return Ok(StepOutcome::Continue);
                }
                self.begin_message()?;
                if b == b'H' {
                    self.state = ResOrRespH;
                } else {
                    self.ty = MessageType::Request;
                    self.method = HttpMethod::Unknown;
                    self.method_recognizer = MethodRecognizer::new();
                    self.state = ReqMethod;
                    return Ok(StepOutcome::Reprocess);
                }
                Ok(StepOutcome::Continue)
            }
            StartReq => {
                if b == CR || b == LF {
                    return Ok(StepOutcome::Continue);
                }
                self.begin_message()?;
                self.method = HttpMethod::Unknown;
                self.method_recognizer = MethodRecognizer::new();
                self.state = ReqMethod;
                Ok(StepOutcome::Reprocess)
            }
            StartRes => {
                if b == CR || b == LF {
                    return Ok(StepOutcome::Continue);
                }
                self.begin_message()?;
                if b != b'H' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ResH;
                Ok(StepOutcome::Continue)
            }

            // --- response start-line ---
            ResOrRespH => {
                if b == b'T' {
                    self.ty = MessageType::Response;
                    self.state = ResHt;
                } else if b == b'E' {
                    self.ty = MessageType::Request;
                    self.method_recognizer = MethodRecognizer::new();
                    self.method_recognizer.advance(b'H');
                    self.method_recognizer.advance(b'E');
                    self.method = HttpMethod::Unknown;
                    self.state = ReqMethod;
                } else {
                    return Err(Errno::InvalidConstant);
                }
                Ok(StepOutcome::Continue)
            }
            ResH => {
                if b != b'T' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ResHt;
                Ok(StepOutcome::Continue)
            }
            ResHt => {
                if b != b'T' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ResHtt;
                Ok(StepOutcome::Continue)
            }
            ResHtt => {
                if b != b'P' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ResHttp;
                Ok(StepOutcome::Continue)
            }
            ResHttp => {
                if b != b'/' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ResFirstHttpMajor;
                Ok(StepOutcome::Continue)
            }
            ResFirstHttpMajor => {
                if !b.is_ascii_digit() {
                    return Err(Errno::InvalidVersion);
                }
                self.http_major = (b - b'0') as u16;
                self.state = ResHttpMajor;
                Ok(StepOutcome::Continue)
            }
            ResHttpMajor => {
                if b.is_ascii_digit() {
                    self.http_major = self.http_major * 10 + (b - b'0') as u16;
                    if self.http_major > 999 {
                        return Err(Errno::InvalidVersion);
                    }
                } else if b == b'.' {
                    self.state = ResFirstHttpMinor;
                } else {
                    return Err(Errno::InvalidVersion);
                }
                Ok(StepOutcome::Continue)
            }
            ResFirstHttpMinor => {
                if !b.is_ascii_digit() {
                    return Err(Errno::InvalidVersion);
                }
                self.http_minor = (b - b'0') as u16;
                self.state = ResHttpMinor;
                Ok(StepOutcome::Continue)
            }
            ResHttpMinor => {
                if b.is_ascii_digit() {
                    self.http_minor = self.http_minor * 10 + (b - b'0') as u16;
                    if self.http_minor > 999 {
                        return Err(Errno::InvalidVersion);
                    }
                } else if b == b' ' {
                    self.state = ResFirstStatusCode;
                } else {
                    return Err(Errno::InvalidVersion);
                }
                Ok(StepOutcome::Continue)
            }
            ResFirstStatusCode => {
                if !b.is_ascii_digit() {
                    return Err(Errno::InvalidStatus);
                }
                self.status_code = (b - b'0') as u16;
                self.state = ResStatusCode;
                Ok(StepOutcome::Continue)
            }
            ResStatusCode => {
                if b.is_ascii_digit() {
                    self.status_code = self.status_code * 10 + (b - b'0') as u16;
                    if self.status_code > 999 {
                        return Err(Errno::InvalidStatus);
                    }
                } else if b == b' ' {
                    self.state = ResStatusStart;
                } else if b == CR {
                    self.state = ResLineAlmostDone;
                } else if b == LF {
                    if self.cfg.strict {
                        return Err(Errno::Strict);
                    }
                    self.state = HeaderFieldStart;
                } else {
                    return Err(Errno::InvalidStatus);
                }
                Ok(StepOutcome::Continue)
            }
            ResStatusStart | ResStatus => {
                if b == CR {
                    self.state = ResLineAlmostDone;
                } else if b == LF {
                    if self.cfg.strict {
                        return Err(Errno::Strict);
                    }
                    self.state = HeaderFieldStart;
                } else {
                    self.state = ResStatus;
                }
                Ok(StepOutcome::Continue)
            }
            ResLineAlmostDone => {
                if b != LF {
                    return Err(Errno::LfExpected);
                }
                self.state = HeaderFieldStart;
                Ok(StepOutcome::Continue)
            }

            // --- request method ---
            ReqMethod => {
                if b == b' ' {
                    if self.method == HttpMethod::Unknown {
                        return Err(Errno::InvalidMethod);
                    }
                    self.state = ReqSpacesBeforeUrl;
                    return Ok(StepOutcome::Continue);
                }
                match self.method_recognizer.advance(b) {
                    MethodMatch::Continue => Ok(StepOutcome::Continue),
                    MethodMatch::Matched(m) => {
                        self.method = m;
                        Ok(StepOutcome::Continue)
                    }
                    MethodMatch::Dead => Err(Errno::InvalidMethod),
                }
            }
            ReqSpacesBeforeUrl => {
                if b == b' ' {
                    return Ok(StepOutcome::Continue);
                }
                self.url_mark = Some(i);
                self.state = self.url_initial_state(b);
                Ok(StepOutcome::Reprocess)
            }

            // --- URL ---
            UrlSchema => {
                if b.is_ascii_alphabetic() {
                    Ok(StepOutcome::Continue)
                } else if b == b':' {
                    self.state = UrlSchemaSlash;
                    Ok(StepOutcome::Continue)
                } else {
                    Err(Errno::InvalidUrl)
                }
            }
            UrlSchemaSlash => {
                if b != b'/' {
                    return Err(Errno::InvalidUrl);
                }
                self.state = UrlSchemaSlashSlash;
                Ok(StepOutcome::Continue)
            }
            UrlSchemaSlashSlash => {
                if b != b'/' {
                    return Err(Errno::InvalidUrl);
                }
                self.state = UrlHost;
                Ok(StepOutcome::Continue)
            }
            UrlHost => match b {
                b' ' | CR | LF => self.end_url(data, i, b),
                b':' => {
                    self.state = UrlPort;
                    Ok(StepOutcome::Continue)
                }
                b'/' => {
                    self.state = UrlPath;
                    Ok(StepOutcome::Continue)
                }
                b'?' => {
                    self.state = UrlQueryStringStart;
                    Ok(StepOutcome::Continue)
                }
                b'#' => {
                    self.state = UrlFragmentStart;
                    Ok(StepOutcome::Continue)
                }
                _ if self.host_char_ok(b) => Ok(StepOutcome::Continue),
                _ => Err(Errno::InvalidHost),
            },
            UrlPort => match b {
                b' ' | CR | LF => self.end_url(data, i, b),
                b'/' => {
                    self.state = UrlPath;
                    Ok(StepOutcome::Continue)
                }
                b'?' => {
                    self.state = UrlQueryStringStart;
                    Ok(StepOutcome::Continue)
                }
                b'#' => {
                    self.state = UrlFragmentStart;
                    Ok(StepOutcome::Continue)
                }
                _ if b.is_ascii_digit() => Ok(StepOutcome::Continue),
                _ => Err(Errno::InvalidPort),
            },
            UrlPath => match b {
                b' ' | CR | LF => self.end_url(data, i, b),
                b'?' => {
                    self.state = UrlQueryStringStart;
                    Ok(StepOutcome::Continue)
                }
                b'#' => {
                    self.state = UrlFragmentStart;
                    Ok(StepOutcome::Continue)
                }
                _ if self.url_char_ok(b) => Ok(StepOutcome::Continue),
                _ => Err(Errno::InvalidPath),
            },
            UrlQueryStringStart => {
                self.state = UrlQueryString;
                Ok(StepOutcome::Reprocess)
            }
            UrlQueryString => match b {
                b' ' | CR | LF => self.end_url(data, i, b),
                b'#' => {
                    self.state = UrlFragmentStart;
                    Ok(StepOutcome::Continue)
                }
                _ if self.url_char_ok(b) => Ok(StepOutcome::Continue),
                _ => Err(Errno::InvalidQueryString),
            },
            UrlFragmentStart => {
                self.state = UrlFragment;
                Ok(StepOutcome::Reprocess)
            }
            UrlFragment => match b {
                b' ' | CR | LF => self.end_url(data, i, b),
                _ if self.url_char_ok(b) => Ok(StepOutcome::Continue),
                _ => Err(Errno::InvalidFragment),
            },

            ReqHttpStart => {
                if b != b'H' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ReqHttpH;
                Ok(StepOutcome::Continue)
            }
            ReqHttpH => {
                if b != b'T' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ReqHttpHt;
                Ok(StepOutcome::Continue)
            }
            ReqHttpHt => {
                if b != b'T' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ReqHttpHtt;
                Ok(StepOutcome::Continue)
            }
            ReqHttpHtt => {
                if b != b'P' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ReqHttpHttp;
                Ok(StepOutcome::Continue)
            }
            ReqHttpHttp => {
                if b != b'/' {
                    return Err(Errno::InvalidConstant);
                }
                self.state = ReqFirstHttpMajor;
                Ok(StepOutcome::Continue)
            }
            ReqFirstHttpMajor => {
                if !b.is_ascii_digit() {
                    return Err(Errno::InvalidVersion);
                }
                self.http_major = (b - b'0') as u16;
                self.state = ReqHttpMajor;
                Ok(StepOutcome::Continue)
            }
            ReqHttpMajor => {
                if b.is_ascii_digit() {
                    self.http_major = self.http_major * 10 + (b - b'0') as u16;
                    if self.http_major > 999 {
                        return Err(Errno::InvalidVersion);
                    }
                } else if b == b'.' {
                    self.state = ReqFirstHttpMinor;
                } else {
                    return Err(Errno::InvalidVersion);
                }
                Ok(StepOutcome::Continue)
            }
            ReqFirstHttpMinor => {
                if !b.is_ascii_digit() {
                    return Err(Errno::InvalidVersion);
                }
                self.http_minor = (b - b'0') as u16;
                self.state = ReqHttpMinor;
                Ok(StepOutcome::Continue)
            }
            ReqHttpMinor => {
                if b.is_ascii_digit() {
                    self.http_minor = self.http_minor * 10 + (b - b'0') as u16;
                    if self.http_minor > 999 {
                        return Err(Errno::InvalidVersion);
                    }
                } else if b == CR {
                    self.state = ReqLineAlmostDone;
                } else if b == LF {
                    if self.cfg.strict {
                        return Err(Errno::Strict);
                    }
                    self.state = HeaderFieldStart;
                } else {
                    return Err(Errno::InvalidVersion);
                }
                Ok(StepOutcome::Continue)
            }
            ReqLineAlmostDone => {
                if b != LF {
                    return Err(Errno::LfExpected);
                }
                self.state = HeaderFieldStart;
                Ok(StepOutcome::Continue)
            }

            // --- headers ---
            HeaderFieldStart => {
                if b == CR {
                    self.state = HeadersAlmostDone;
                    Ok(StepOutcome::Continue)
                } else if b == LF {
                    if self.cfg.strict {
                        return Err(Errno::Strict);
                    }
                    self.finish_headers(i)
                } else if tables::TOKEN[b as usize] {
                    self.header_field_mark = Some(i);
                    self.header_name_recognizer = HeaderNameRecognizer::new();
                    self.header_state = self.header_name_recognizer.advance(b);
                    self.state = HeaderField;
                    Ok(StepOutcome::Continue)
                } else {
                    Err(Errno::InvalidHeaderToken)
                }
            }
            HeaderField => {
                if b == b':' {
                    self.emit_header_field(data, i)?;
                    self.state = HeaderValueDiscardWs;
                    Ok(StepOutcome::Continue)
                } else if tables::TOKEN[b as usize] {
                    self.header_state = self.header_name_recognizer.advance(b);
                    Ok(StepOutcome::Continue)
                } else if b == b' ' {
                    self.state = HeaderFieldWs;
                    Ok(StepOutcome::Continue)
                } else {
                    Err(Errno::InvalidHeaderToken)
                }
            }
            // A space was seen after the name but before the colon.
            // More trailing spaces keep the match as-is; the colon
            // closes the field normally; anything else means this
            // wasn't really a lone trailing space (e.g. "Foo Bar: v"),
            // so the name collapses to General and scanning resumes.
            HeaderFieldWs => {
                if b == b' ' {
                    Ok(StepOutcome::Continue)
                } else if b == b':' {
                    self.emit_header_field(data, i)?;
                    self.state = HeaderValueDiscardWs;
                    Ok(StepOutcome::Continue)
                } else if tables::TOKEN[b as usize] {
                    self.header_state = HeaderName::General;
                    self.state = HeaderField;
                    Ok(StepOutcome::Continue)
                } else {
                    Err(Errno::InvalidHeaderToken)
                }
            }
            HeaderValueDiscardWs => {
                if b == b' ' || b == b'\t' {
                    return Ok(StepOutcome::Continue);
                }
                self.start_header_value();
                self.header_value_mark = Some(i);
                self.state = HeaderValue;
                Ok(StepOutcome::Reprocess)
            }
            HeaderValue => {
                if b == CR {
                    self.emit_header_value(data, i)?;
                    self.finalize_value_flags();
                    self.state = HeaderAlmostDone;
                    Ok(StepOutcome::Continue)
                } else if b == LF {
                    if self.cfg.strict {
                        return Err(Errno::Strict);
                    }
                    self.emit_header_value(data, i)?;
                    self.finalize_value_flags();
                    self.state = HeaderValueLws;
                    Ok(StepOutcome::Continue)
                } else {
                    if self.header_state == HeaderName::ContentLength {
                        if !b.is_ascii_digit() {
                            if b == b' ' {
                                return Ok(StepOutcome::Continue);
                            }
                            return Err(Errno::InvalidContentLength);
                        }
                        self.accumulate_content_length_digit(b)?;
                    } else {
                        self.value_recognizer.advance(b);
                    }
                    Ok(StepOutcome::Continue)
                }
            }
            HeaderAlmostDone => {
                if b != LF {
                    return Err(Errno::LfExpected);
                }
                self.state = HeaderValueLws;
                Ok(StepOutcome::Continue)
            }
            HeaderValueLws => {
                if b == b' ' || b == b'\t' {
                    self.header_value_mark = Some(i);
                    self.state = HeaderValue;
                } else {
                    self.state = HeaderFieldStart;
                    return Ok(StepOutcome::Reprocess);
                }
                Ok(StepOutcome::Continue)
            }
            HeadersAlmostDone => {
                if b != LF {
                    return Err(Errno::LfExpected);
                }
                self.finish_headers(i)
            }

            // --- body ---
            BodyIdentity | BodyIdentityEof | ChunkData => {
                // Handled by the bulk fast paths in `execute`; a byte
                // should never reach the generic step dispatch in
                // these states.
                Err(Errno::InvalidInternalState)
            }
            ChunkSizeStart => {
                let v = tables::UNHEX[b as usize];
                if v == 0xFF {
                    return Err(Errno::InvalidChunkSize);
                }
                self.chunk_size = v as u64;
                self.state = ChunkSize;
                Ok(StepOutcome::Continue)
            }
            ChunkSize => {
                let v = tables::UNHEX[b as usize];
                if v != 0xFF {
                    match self.chunk_size.checked_mul(16).and_then(|x| x.checked_add(v as u64)) {
                        Some(sz) => self.chunk_size = sz,
                        None => return Err(Errno::InvalidChunkSize),
                    }
                } else if b == b';' {
                    self.state = ChunkParameters;
                } else if b == CR {
                    self.state = ChunkSizeAlmostDone;
                } else if b == LF {
                    if self.cfg.strict {
                        return Err(Errno::Strict);
                    }
                    return self.after_chunk_size_line();
                } else {
                    return Err(Errno::InvalidChunkSize);
                }
                Ok(StepOutcome::Continue)
            }
            ChunkParameters => {
                if b == CR {
                    self.state = ChunkSizeAlmostDone;
                } else if b == LF {
                    if self.cfg.strict {
                        return Err(Errno::Strict);
                    }
                    return self.after_chunk_size_line();
                }
                Ok(StepOutcome::Continue)
            }
            ChunkSizeAlmostDone => {
                if b != LF {
                    return Err(Errno::LfExpected);
                }
                self.after_chunk_size_line()
            }
            ChunkDataAlmostDone => {
                if b != CR {
                    return Err(Errno::InvalidChunkSize);
                }
                self.state = ChunkDataDone;
                Ok(StepOutcome::Continue)
            }
            ChunkDataDone => {
                if b != LF {
                    return Err(Errno::LfExpected);
                }
                self.nread = 0;
                self.state = ChunkSizeStart;
                Ok(StepOutcome::Continue)
            }

            Dead => Err(Errno::ClosedConnection),
        }
    }

    fn after_chunk_size_line(&mut self) -> PResult<StepOutcome> {
        if self.chunk_size == 0 {
            self.flags.insert(Flags::TRAILING);
            self.state = State::HeaderFieldStart;
        } else {
            self.state = State::ChunkData;
        }
        Ok(StepOutcome::Continue)
    }

    fn end_url(&mut self, data: &[u8], i: usize, b: u8) -> PResult<StepOutcome> {
        self.emit_url(data, i)?;
        if b == b' ' {
            self.state = State::ReqHttpStart;
        } else {
            self.http_major = 0;
            self.http_minor = 9;
            if b == CR {
                self.state = State::ReqLineAlmostDone;
            } else if self.cfg.strict {
                return Err(Errno::Strict);
            } else {
                self.state = State::HeaderFieldStart;
            }
        }
        Ok(StepOutcome::Continue)
    }
}
