use chrono::{DateTime, Utc};

use crate::chan::ChannelExt;
use crate::prefix::Prefix;

/// A message parsed from one wire line.
///
/// Messages are values: once parsed they are never mutated by the library.
///
/// # Example
///
/// ```
/// use slirc_proto::Message;
///
/// let msg = Message::parse(":nick!user@host PRIVMSG #channel :Hello!").unwrap();
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.param(0), Some("#channel"));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message origin, if the line carried one.
    pub prefix: Option<Prefix>,
    /// Verb or three-digit numeric reply code.
    pub command: String,
    /// Middle parameters, in order.
    pub params: Vec<String>,
    /// The trailing parameter (text of a PRIVMSG/NOTICE).
    pub content: String,
    /// Addressee: the first parameter, or the trailing text for a bare JOIN.
    pub to: String,
    /// Nick of the sender (prefix name).
    pub from: String,
    /// When the line was received.
    pub timestamp: DateTime<Utc>,
    /// The trimmed wire line. For debugging only.
    pub raw: String,
}

impl Message {
    /// Parse a wire line. See [`crate::message::parse`].
    pub fn parse(line: &str) -> Option<Message> {
        super::parse(line)
    }

    /// A message with only the raw line and receipt time set.
    pub(crate) fn empty(raw: &str) -> Self {
        Self {
            prefix: None,
            command: String::new(),
            params: Vec::new(),
            content: String::new(),
            to: String::new(),
            from: String::new(),
            timestamp: Utc::now(),
            raw: raw.to_owned(),
        }
    }

    /// Get the parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Nick (or server name) of the sender, empty without a prefix.
    pub fn name(&self) -> &str {
        self.prefix.as_ref().map_or("", |p| p.name.as_str())
    }

    /// Username of the sender, empty if unknown.
    pub fn user(&self) -> &str {
        self.prefix.as_ref().map_or("", |p| p.user.as_str())
    }

    /// Hostname of the sender, empty if unknown.
    pub fn host(&self) -> &str {
        self.prefix.as_ref().map_or("", |p| p.host.as_str())
    }

    /// Whether the command is a numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit())
    }

    /// Where a reply to this message should go.
    ///
    /// Messages addressed to a channel are answered in the channel, private
    /// messages are answered to the sender.
    pub fn response_target(&self) -> &str {
        if self.to.is_channel_name() {
            &self.to
        } else {
            &self.from
        }
    }
}
