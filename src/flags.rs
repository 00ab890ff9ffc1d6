//! Parser flag bitset.
//!
//! Hand-rolled rather than pulled from the `bitflags` crate: plain
//! `pub const` bit values composed with `|`. The set is small and
//! fixed, so a dependency buys nothing here.

/// Bits tracked across a single message's lifetime (reset at
/// `message_begin`, except where noted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u16);

impl Flags {
    pub const CHUNKED: u16 = 0x0001;
    pub const KEEP_ALIVE: u16 = 0x0002;
    pub const CLOSE: u16 = 0x0004;
    /// Set once the zero-size chunk has been seen; headers parsed
    /// after this point are trailers.
    pub const TRAILING: u16 = 0x0008;
    pub const UPGRADE: u16 = 0x0010;
    /// `headers_complete` returned 1: suppress body framing entirely.
    pub const SKIPBODY: u16 = 0x0020;

    pub const fn empty() -> Self {
        Flags(0)
    }

    pub fn contains(self, bit: u16) -> bool {
        self.0 & bit == bit
    }

    pub fn insert(&mut self, bit: u16) {
        self.0 |= bit;
    }

    pub fn remove(&mut self, bit: u16) {
        self.0 &= !bit;
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut f = Flags::empty();
        assert!(!f.contains(Flags::CHUNKED));
        f.insert(Flags::CHUNKED);
        assert!(f.contains(Flags::CHUNKED));
        f.insert(Flags::UPGRADE);
        assert!(f.contains(Flags::UPGRADE));
        assert!(f.contains(Flags::CHUNKED));
    }

    #[test]
    fn remove_clears_only_that_bit() {
        let mut f = Flags::empty();
        f.insert(Flags::CHUNKED);
        f.insert(Flags::KEEP_ALIVE);
        f.remove(Flags::CHUNKED);
        assert!(!f.contains(Flags::CHUNKED));
        assert!(f.contains(Flags::KEEP_ALIVE));
    }

    #[test]
    fn reset_clears_everything() {
        let mut f = Flags::empty();
        f.insert(Flags::CHUNKED);
        f.insert(Flags::CLOSE);
        f.reset();
        assert!(!f.contains(Flags::CHUNKED));
        assert!(!f.contains(Flags::CLOSE));
    }
}
