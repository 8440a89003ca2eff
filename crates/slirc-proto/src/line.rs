//! Line-based codec for tokio.
//!
//! Reads newline-terminated lines regardless of whether the server uses
//! CRLF or bare LF, and writes lines with CRLF framing. Decoding is lenient:
//! invalid UTF-8 is replaced rather than rejected, and over-long lines are
//! discarded, so a misbehaving peer cannot end the session through the
//! codec. Only I/O errors surface.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error;

/// Default maximum length of an incoming line.
///
/// Larger than the RFC 512 bytes to leave room for IRCv3 tags.
pub const MAX_IRC_LINE_LEN: usize = 8191;

/// Line-based codec that handles newline-terminated messages.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping the remainder of an over-long line
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default maximum line length.
    pub fn new() -> Self {
        Self::with_max_len(MAX_IRC_LINE_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    fn decode_line(line: &[u8]) -> String {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        String::from_utf8_lossy(line).into_owned()
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if src.len() > self.max_len {
                    tracing::debug!(len = src.len(), "Discarding over-long line");
                    src.clear();
                    self.discarding = true;
                }
                self.next_index = src.len();
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if line.len() > self.max_len {
                tracing::debug!(len = line.len(), "Discarding over-long line");
                continue;
            }

            return Ok(Some(Self::decode_line(&line)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        // An unterminated final line still counts.
        self.next_index = 0;
        if src.is_empty() || std::mem::take(&mut self.discarding) {
            src.clear();
            return Ok(None);
        }
        let rest = src.split();
        Ok(Some(Self::decode_line(&rest)))
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_crlf_and_lf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :a\r\nPING :b\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :a"));
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :b"));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :ab");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"c\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :abc"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #a :\xff\r\n"[..]);
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert!(line.starts_with("PRIVMSG #a :"));
        assert!(line.contains('\u{FFFD}'));
    }

    #[test]
    fn test_overlong_line_discarded() {
        let mut codec = LineCodec::with_max_len(16);
        let mut buf = BytesMut::from(&"x".repeat(40)[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"tail\r\nPING :ok\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :ok"));
    }

    #[test]
    fn test_decode_eof_flushes_unterminated() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("ERROR :closing");
        assert_eq!(
            codec.decode_eof(&mut buf).unwrap().as_deref(),
            Some("ERROR :closing")
        );
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_encode_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        codec.encode("NICK bot".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"NICK bot\r\n");
    }
}
