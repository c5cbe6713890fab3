//! Key Codec
//!
//! Composes a one-byte namespace tag with a raw key into a single ordered
//! byte sequence.
//!
//! ## Layout
//! ```text
//! ┌─────────┬──────────────────────────┐
//! │ tag (1) │ raw key (variable)       │
//! └─────────┴──────────────────────────┘
//! ```
//!
//! The tag has a fixed width, so it needs no escaping: all keys of one tag
//! sort together, and within a tag keys sort by raw byte order. Range bounds
//! must be built with [`encode`] as well, so scans and point lookups agree on
//! ordering.

/// Width of the tag prefix in bytes
pub const TAG_LEN: usize = 1;

/// Encode a tag and raw key into a composite key
pub fn encode(tag: u8, raw_key: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(raw_key.len() + TAG_LEN);
    key.push(tag);
    key.extend_from_slice(raw_key);
    key
}

/// Tag of a composite key, or `0` for an empty key
pub fn decode_tag(encoded: &[u8]) -> u8 {
    encoded.first().copied().unwrap_or(0)
}

/// Raw key of a composite key (everything after the tag)
pub fn decode_key(encoded: &[u8]) -> &[u8] {
    encoded.get(TAG_LEN..).unwrap_or(&[])
}

/// Encode `[from, till)` under one tag, swapping the bounds if they are reversed
///
/// Returns `(lower, upper)` with `lower <= upper`.
pub fn encode_range(tag: u8, from: &[u8], till: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let lower = encode(tag, from);
    let upper = encode(tag, till);
    if lower > upper {
        (upper, lower)
    } else {
        (lower, upper)
    }
}
