//! # slirc-proto
//!
//! Client-side building blocks for the IRC wire protocol.
//!
//! ## Features
//!
//! - Lenient line parsing into [`Message`] values (malformed lines yield `None`)
//! - `nick!user@host` prefix decomposition
//! - Outbound command builders for the verbs a bot emits
//! - Long-message splitting that respects the 512-byte line limit
//! - SASL PLAIN payload encoding
//! - Optional Tokio line codec for line-buffered scanning
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{command, Message};
//!
//! let msg = Message::parse(":nick!user@host PRIVMSG #chan :hello there").unwrap();
//! assert_eq!(msg.from, "nick");
//! assert_eq!(msg.to, "#chan");
//! assert_eq!(msg.content, "hello there");
//!
//! assert_eq!(command::privmsg("#chan", "hi"), "PRIVMSG #chan :hi");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;
pub mod sasl;
pub mod split;

pub use self::chan::{fold_name, names_equal, split_channel_key, ChannelExt};
pub use self::error::ProtocolError;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::{parse, Message};
pub use self::prefix::Prefix;
pub use self::split::{line_budget, split_text, MAX_LINE_LEN};
