//! Incremental, allocation-free parser core for HTTP/1.x request and
//! response messages.
//!
//! One [`Parser`] is bound to one logical byte stream and reused
//! across pipelined messages on it. Bytes are fed through
//! [`Parser::execute`] as they arrive; the parser never buffers or
//! reads ahead, and reports syntactic element boundaries (URL, header
//! field, header value, body) through the [`Callbacks`] trait as they
//! are recognized.
//!
//! Out of scope: routing/caching/auth, transport and TLS, URL
//! structural decomposition past delimiter recognition,
//! percent-decoding, header-value semantics beyond the four framing
//! headers, and anything past the header terminator of a connection
//! upgrade — the caller takes the tail bytes from there.

#![deny(unsafe_code)]

mod callbacks;
mod config;
mod error;
mod flags;
mod header;
mod method;
mod parser;
mod state;
mod tables;
mod trie;

pub use callbacks::{Callbacks, NoopCallbacks};
pub use config::{ParserConfig, DEFAULT_MAX_HEADER_SIZE};
pub use error::{errno_description, errno_name, Errno};
pub use method::{method_name, HttpMethod};
pub use parser::{MessageType, Parser};
