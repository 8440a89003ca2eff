//! IRC message prefix (`nick!user@host`) handling.

mod serialize;
mod types;

pub use self::types::Prefix;
