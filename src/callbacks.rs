//! Callback contract.
//!
//! The core takes its seven callback slots as one generic trait
//! parameter rather than seven `Option<Box<dyn FnMut>>` fields: a
//! trait with default no-op methods costs nothing per call site (it
//! monomorphizes away), and there is nothing to allocate or box.
//! Callers that want trait objects can implement `Callbacks` for
//! `Box<dyn Callbacks>` themselves; the core doesn't need to.

/// Implemented by the application embedding the parser. Every method
/// is optional (default: no-op / continue).
///
/// Return `0` to continue, nonzero to abort with the matching `CB_*`
/// error — except [`Callbacks::on_headers_complete`], whose `1` means
/// "this message has no body" rather than abort.
#[allow(unused_variables)]
pub trait Callbacks {
    fn on_message_begin(&mut self) -> i32 {
        0
    }

    /// A contiguous slice of the request URL. May fire more than once
    /// per logical URL if it straddles an `execute()` buffer boundary.
    fn on_url(&mut self, data: &[u8]) -> i32 {
        0
    }

    /// A contiguous slice of a header field name.
    fn on_header_field(&mut self, data: &[u8]) -> i32 {
        0
    }

    /// A contiguous slice of a header field value.
    fn on_header_value(&mut self, data: &[u8]) -> i32 {
        0
    }

    /// Fired on the empty line ending the header block, before body
    /// framing is decided. Returning `1` suppresses body framing
    /// entirely (used for HEAD responses); any other nonzero aborts.
    fn on_headers_complete(&mut self) -> i32 {
        0
    }

    /// A contiguous slice of body data (identity or de-chunked).
    fn on_body(&mut self, data: &[u8]) -> i32 {
        0
    }

    fn on_message_complete(&mut self) -> i32 {
        0
    }
}

/// A [`Callbacks`] implementation that does nothing and never aborts;
/// useful for tests that only care about scalar readouts, and as the
/// default when nobody supplies their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl Callbacks for NoopCallbacks {}
