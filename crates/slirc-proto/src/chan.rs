//! Channel name utilities.
//!
//! # Reference
//! - RFC 2812 Section 1.3: Channel names

/// Extension trait for checking if a string names a channel.
pub trait ChannelExt {
    /// Check if this string is a valid IRC channel name.
    ///
    /// Valid channel names start with '#', '&', '+', or '!' and contain no
    /// space, comma, BEL or other control characters.
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        let mut chars = self.chars();
        if !matches!(chars.next(), Some('#' | '&' | '+' | '!')) {
            return false;
        }
        chars.all(|c| c != ' ' && c != ',' && !c.is_control())
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }
}

/// Split a configured channel entry of the form `name` or `name:key`.
///
/// Only the first colon separates, so keys may themselves contain colons.
/// An empty key is treated as no key.
pub fn split_channel_key(entry: &str) -> (&str, Option<&str>) {
    match entry.split_once(':') {
        Some((name, key)) if !key.is_empty() => (name, Some(key)),
        Some((name, _)) => (name, None),
        None => (entry, None),
    }
}

/// Fold a nick or channel name for case-insensitive lookups.
///
/// Uses the rfc1459 mapping most networks advertise, where `[]\~` are the
/// uppercase forms of `{}|^`.
pub fn fold_name(name: &str) -> String {
    name.chars().map(fold_char).collect()
}

/// Compare two names under [`fold_name`] without allocating.
pub fn names_equal(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().zip(b.chars()).all(|(x, y)| fold_char(x) == fold_char(y))
}

fn fold_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        other => other.to_ascii_lowercase(),
    }
}
