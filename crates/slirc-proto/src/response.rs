//! Numeric replies the client reacts to.
//!
//! # Reference
//! - RFC 2812 Section 5
//! - IRCv3 SASL 3.1: <https://ircv3.net/specs/extensions/sasl-3.1>

/// Registration accepted.
pub const RPL_WELCOME: &str = "001";
/// End of the message of the day.
pub const RPL_ENDOFMOTD: &str = "376";
/// Server has no message of the day.
pub const ERR_NOMOTD: &str = "422";
/// SASL authentication succeeded.
pub const RPL_SASLSUCCESS: &str = "903";
/// SASL authentication failed.
pub const ERR_SASLFAIL: &str = "904";

/// Whether `command` ends registration from the client's point of view.
pub fn is_registration_complete(command: &str) -> bool {
    matches!(command, RPL_WELCOME | RPL_ENDOFMOTD | ERR_NOMOTD)
}
