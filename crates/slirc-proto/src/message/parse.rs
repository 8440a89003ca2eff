//! Wire line parsing.
//!
//! The parser is deliberately lenient: it never fails loudly. Lines too short
//! to carry a command, or whose prefix is not followed by a space, produce
//! `None` and are meant to be dropped by the caller.

use std::str::FromStr;

use crate::error::ProtocolError;
use crate::prefix::Prefix;

use super::types::Message;

/// Parse one wire line into a [`Message`].
///
/// Trailing CR, LF, NUL and spaces are ignored. Returns `None` when the
/// trimmed line is shorter than two bytes, or starts with `:` but has no
/// space at index 2 or later.
///
/// The trailing parameter starts at the first `:` after the command. A line
/// whose command token is empty yields a message with every field empty.
pub fn parse(line: &str) -> Option<Message> {
    let line = line.trim_end_matches([' ', '\r', '\n', '\0']);
    if line.len() < 2 {
        return None;
    }

    let mut msg = Message::empty(line);
    let mut rest = line;

    if line.starts_with(':') {
        let end = line.find(' ')?;
        if end < 2 {
            return None;
        }
        msg.prefix = Some(Prefix::parse(&line[1..end]));
        rest = &line[end + 1..];
    }

    let (command, tail) = match rest.find(' ') {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };

    if command.is_empty() {
        return Some(Message::empty(line));
    }
    msg.command = command.to_owned();

    if let Some(tail) = tail {
        match tail.find(':') {
            Some(i) => {
                let middle = &tail[..i];
                msg.params = split_params(middle.strip_suffix(' ').unwrap_or(middle));
                msg.content = tail[i + 1..].to_owned();
            }
            None => msg.params = split_params(tail),
        }
    }

    msg.to = match msg.params.first() {
        Some(first) => first.clone(),
        // Some servers send the channel of a JOIN as the trailing parameter.
        None if msg.command == "JOIN" => msg.content.clone(),
        None => String::new(),
    };
    if let Some(prefix) = &msg.prefix {
        msg.from = prefix.name.clone();
    }

    Some(msg)
}

fn split_params(s: &str) -> Vec<String> {
    s.split(' ')
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).ok_or_else(|| ProtocolError::MalformedLine(s.to_owned()))
    }
}
