//! SASL helpers for IRC.
//!
//! Only the PLAIN mechanism is provided; it is what a bot authenticating
//! with an account password needs.
//!
//! # Reference
//! - IRCv3 SASL: <https://ircv3.net/specs/extensions/sasl-3.1>
//! - RFC 4616 (PLAIN): <https://tools.ietf.org/html/rfc4616>

mod plain;

pub use plain::{encode_plain, encode_plain_with_authzid};

/// Capability name requested with `CAP REQ`.
pub const CAPABILITY: &str = "sasl";

/// Mechanism name sent with the first `AUTHENTICATE`.
pub const MECHANISM_PLAIN: &str = "PLAIN";

/// Maximum length of a single `AUTHENTICATE` payload.
pub const SASL_CHUNK_SIZE: usize = 400;

/// Split an encoded SASL response into `AUTHENTICATE` payloads.
///
/// Responses longer than [`SASL_CHUNK_SIZE`] are sent in pieces. When the
/// last piece is exactly [`SASL_CHUNK_SIZE`] long, a lone `+` follows to
/// tell the server the response is complete.
pub fn chunk_response(encoded: &str) -> Vec<&str> {
    let mut chunks: Vec<&str> = Vec::new();
    let mut rest = encoded;
    while rest.len() > SASL_CHUNK_SIZE {
        // base64 is ASCII, so any index is a char boundary
        let (head, tail) = rest.split_at(SASL_CHUNK_SIZE);
        chunks.push(head);
        rest = tail;
    }
    if rest.is_empty() {
        chunks.push("+");
    } else {
        chunks.push(rest);
        if rest.len() == SASL_CHUNK_SIZE {
            chunks.push("+");
        }
    }
    chunks
}
