//! The message-state-machine's state enum, grouped by phase: start,
//! response start-line, request start-line (with URL sub-states
//! embedded), headers, body.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum State {
    // --- start ---
    StartReqOrRes,
    StartReq,
    StartRes,
    Dead,

    // --- response start-line ---
    ResOrRespH,
    ResH,
    ResHt,
    ResHtt,
    ResHttp,
    ResFirstHttpMajor,
    ResHttpMajor,
    ResFirstHttpMinor,
    ResHttpMinor,
    ResFirstStatusCode,
    ResStatusCode,
    ResStatusStart,
    ResStatus,
    ResLineAlmostDone,

    // --- request start-line / method ---
    ReqMethod,
    ReqSpacesBeforeUrl,

    // --- URL sub-states, embedded in the request start-line ---
    UrlSchema,
    UrlSchemaSlash,
    UrlSchemaSlashSlash,
    UrlHost,
    UrlPort,
    UrlPath,
    UrlQueryStringStart,
    UrlQueryString,
    UrlFragmentStart,
    UrlFragment,

    ReqHttpStart,
    ReqHttpH,
    ReqHttpHt,
    ReqHttpHtt,
    ReqHttpHttp,
    ReqFirstHttpMajor,
    ReqHttpMajor,
    ReqFirstHttpMinor,
    ReqHttpMinor,
    ReqLineAlmostDone,

    // --- headers ---
    HeaderFieldStart,
    HeaderField,
    HeaderFieldWs,
    HeaderValueDiscardWs,
    HeaderValue,
    HeaderValueLws,
    HeaderAlmostDone,
    HeadersAlmostDone,

    // --- body ---
    BodyIdentity,
    BodyIdentityEof,
    ChunkSizeStart,
    ChunkSize,
    ChunkParameters,
    ChunkSizeAlmostDone,
    ChunkData,
    ChunkDataAlmostDone,
    ChunkDataDone,
}

impl State {
    /// Header-size overflow guard region: `nread` accumulates
    /// while the parser is anywhere from the very start of a message
    /// through `HEADERS_ALMOST_DONE`, and resets the moment we leave
    /// that region (entering body, or re-entering it for trailers).
    pub fn counts_toward_header_overflow(self) -> bool {
        !matches!(
            self,
            State::Dead
                | State::BodyIdentity
                | State::BodyIdentityEof
                | State::ChunkSizeStart
                | State::ChunkSize
                | State::ChunkParameters
                | State::ChunkSizeAlmostDone
                | State::ChunkData
                | State::ChunkDataAlmostDone
                | State::ChunkDataDone
        )
    }

    pub fn is_url_state(self) -> bool {
        matches!(
            self,
            State::UrlSchema
                | State::UrlSchemaSlash
                | State::UrlSchemaSlashSlash
                | State::UrlHost
                | State::UrlPort
                | State::UrlPath
                | State::UrlQueryStringStart
                | State::UrlQueryString
                | State::UrlFragmentStart
                | State::UrlFragment
        )
    }
}
