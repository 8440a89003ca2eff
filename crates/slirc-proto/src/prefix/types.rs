//! IRC message prefix types.
//!
//! A prefix identifies the origin of a message: either a server name or a
//! user's `nick!user@host` mask. Both forms decompose into the same three
//! fields here; a server name is simply a prefix with only `name` set.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::str::FromStr;

/// Length budget the placeholder prefix is sized against.
///
/// 510 bytes of line minus the 353 bytes a server may reserve for routing
/// data leaves room for `nick!user@host` where user echoes the nick.
const PLACEHOLDER_BUDGET: usize = 510 - 353;

/// Origin of a message, decomposed from `nick!user@host`.
///
/// Any of the three parts may be empty.
#[derive(Clone, Default, Eq, PartialEq, Debug, Hash)]
pub struct Prefix {
    /// Nickname or server name.
    pub name: String,
    /// Username (ident), if present.
    pub user: String,
    /// Hostname, if present.
    pub host: String,
}

impl Prefix {
    /// Create a prefix from its three components.
    pub fn new(name: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user: user.into(),
            host: host.into(),
        }
    }

    /// Decompose a raw prefix string.
    ///
    /// Rules, in priority order:
    /// 1. `!` and `@` both present with `@` after `!`: name, user and host.
    /// 2. `!` present: name and user.
    /// 3. `@` present: name and host.
    /// 4. Otherwise the whole string is the name.
    ///
    /// A separator in the first position does not count, so `!foo` is a name.
    pub fn parse(raw: &str) -> Self {
        let user = raw.find('!').filter(|&i| i > 0);
        let host = raw.find('@').filter(|&i| i > 0);

        match (user, host) {
            (Some(u), Some(h)) if h > u => Self::new(&raw[..u], &raw[u + 1..h], &raw[h + 1..]),
            (Some(u), _) => Self::new(&raw[..u], &raw[u + 1..], ""),
            (None, Some(h)) => Self::new(&raw[..h], "", &raw[h + 1..]),
            (None, None) => Self::new(raw, "", ""),
        }
    }

    /// A conservative stand-in for our own prefix before the server has
    /// echoed it back.
    ///
    /// The host is padded so that message splitting computed against this
    /// prefix never produces lines the server would truncate once it
    /// substitutes the real (unknown) prefix.
    pub fn placeholder(nick: &str) -> Self {
        let host_len = PLACEHOLDER_BUDGET.saturating_sub(nick.len() * 2);
        Self::new(nick, nick, "*".repeat(host_len))
    }

    /// Whether all three parts are empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.user.is_empty() && self.host.is_empty()
    }
}

impl FromStr for Prefix {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Prefix::parse(s))
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mask() {
        let p = Prefix::parse("nick!user@host");
        assert_eq!(p, Prefix::new("nick", "user", "host"));
    }

    #[test]
    fn test_nick_host() {
        let p = Prefix::parse("nick@host");
        assert_eq!(p, Prefix::new("nick", "", "host"));
    }

    #[test]
    fn test_nick_user() {
        let p = Prefix::parse("nick!user");
        assert_eq!(p, Prefix::new("nick", "user", ""));
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(Prefix::parse("nick"), Prefix::new("nick", "", ""));
        assert_eq!(
            Prefix::parse("irc.example.com"),
            Prefix::new("irc.example.com", "", "")
        );
    }

    #[test]
    fn test_empty_input() {
        let p = Prefix::parse("");
        assert_eq!(p.name, "");
        assert!(p.is_empty());
    }

    #[test]
    fn test_host_before_bang() {
        // '@' does not follow '!', so the user rule wins.
        let p = Prefix::parse("a@b!c");
        assert_eq!(p, Prefix::new("a@b", "c", ""));
    }

    #[test]
    fn test_leading_separator_is_name() {
        assert_eq!(Prefix::parse("!user"), Prefix::new("!user", "", ""));
    }

    #[test]
    fn test_host_with_extra_at() {
        let p = Prefix::parse("n!u@h@x");
        assert_eq!(p, Prefix::new("n", "u", "h@x"));
    }

    #[test]
    fn test_placeholder_length() {
        let p = Prefix::placeholder("bot");
        assert_eq!(p.name, "bot");
        assert_eq!(p.user, "bot");
        assert_eq!(p.host.len(), 157 - 6);
        assert_eq!(p.to_string().len(), 3 + 1 + 3 + 1 + 151);
    }
}
