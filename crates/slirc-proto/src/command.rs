//! Outbound command builders.
//!
//! Each builder is plain string concatenation in wire order, without the
//! CRLF terminator. No escaping is done beyond the protocol's own colon and
//! space conventions: callers must not pass CR or LF in arguments.

/// CTCP delimiter byte.
const CTCP_DELIM: char = '\x01';

/// `PASS <password>`
pub fn pass(password: &str) -> String {
    format!("PASS {}", password)
}

/// `NICK <nick>`
pub fn nick(nick: &str) -> String {
    format!("NICK {}", nick)
}

/// `USER <user> <mode> * :<realname>`
pub fn user(user: &str, mode: &str, realname: &str) -> String {
    format!("USER {} {} * :{}", user, mode, realname)
}

/// `JOIN <channel> [<key>]`
pub fn join(channel: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("JOIN {} {}", channel, key),
        None => format!("JOIN {}", channel),
    }
}

/// `PART <channel> [:<reason>]`
pub fn part(channel: &str, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("PART {} :{}", channel, reason),
        None => format!("PART {}", channel),
    }
}

/// `PRIVMSG <target> :<text>`
pub fn privmsg(target: &str, text: &str) -> String {
    format!("PRIVMSG {} :{}", target, text)
}

/// `NOTICE <target> :<text>`
pub fn notice(target: &str, text: &str) -> String {
    format!("NOTICE {} :{}", target, text)
}

/// CTCP ACTION (`/me`): `PRIVMSG <target> :\x01ACTION <text>\x01`
pub fn action(target: &str, text: &str) -> String {
    format!("PRIVMSG {} :{}ACTION {}{}", target, CTCP_DELIM, text, CTCP_DELIM)
}

/// Bytes [`action`] adds around the text, on top of a plain PRIVMSG.
pub const ACTION_OVERHEAD: usize = "\x01ACTION \x01".len();

/// `TOPIC <channel> :<topic>`
pub fn topic(channel: &str, topic: &str) -> String {
    format!("TOPIC {} :{}", channel, topic)
}

/// `MODE <channel> <mode> <user>`
///
/// Use `+o`/`-o` to op or deop, `+b` to ban.
pub fn mode(channel: &str, mode: &str, user: &str) -> String {
    format!("MODE {} {} {}", channel, mode, user)
}

/// `KICK <channel> <user> :<reason>`
pub fn kick(channel: &str, user: &str, reason: &str) -> String {
    format!("KICK {} {} :{}", channel, user, reason)
}

/// `PONG :<token>`
pub fn pong(token: &str) -> String {
    format!("PONG :{}", token)
}

/// `CAP REQ :<capability>`
pub fn cap_req(capability: &str) -> String {
    format!("CAP REQ :{}", capability)
}

/// `CAP END`
pub fn cap_end() -> String {
    "CAP END".to_owned()
}

/// `AUTHENTICATE <data>`
pub fn authenticate(data: &str) -> String {
    format!("AUTHENTICATE {}", data)
}
